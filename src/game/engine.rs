use log::{debug, info, warn};
use statig::blocking::IntoStateMachineExt as _;

use crate::{config::GameplayConfig, gesture::GestureCommand, telemetry};

use super::actions::GameApplyStatus;
use super::events::GameEvent;
use super::machine::{DispatchContext, GameMachine};
use super::randomizer::CommandRandomizer;
use super::snapshot::GameState;
use super::store::HighScoreStore;

#[derive(Clone, Copy, Debug)]
pub struct GameApplyResult {
    pub before: GameState,
    pub after: GameState,
    pub status: GameApplyStatus,
}

impl GameApplyResult {
    pub fn changed(self) -> bool {
        matches!(self.status, GameApplyStatus::Applied)
    }

    /// An accepted match whose ramp actually lowered the time budget.
    pub fn ramped(self) -> bool {
        self.changed() && self.after.just_ramped
    }

    pub fn game_over(self) -> bool {
        self.changed() && !self.before.is_over && self.after.is_over
    }

    pub fn new_high_score(self) -> Option<u32> {
        (self.game_over() && self.after.high_score > self.before.high_score)
            .then_some(self.after.high_score)
    }
}

pub struct GameEngine<R, S> {
    machine: statig::blocking::StateMachine<GameMachine>,
    randomizer: R,
    store: S,
}

impl<R, S> GameEngine<R, S>
where
    R: CommandRandomizer,
    S: HighScoreStore,
{
    pub fn new(randomizer: R, mut store: S, config: &'static GameplayConfig) -> Self {
        let high_score = store.load();
        Self {
            machine: GameMachine::new(config, high_score).state_machine(),
            randomizer,
            store,
        }
    }

    pub fn state(&self) -> GameState {
        self.machine.inner().state
    }

    pub fn start(&mut self) -> GameApplyResult {
        let high_score = self.store.load();
        let first = self.randomizer.next_command(None);
        let result = self.apply(GameEvent::Start { high_score, first });
        telemetry::record_game_started();
        info!(
            "game: started first={} high_score={}",
            first.label(),
            result.after.high_score
        );
        result
    }

    /// Idempotent; persists the high score only when this game set a record.
    pub fn end(&mut self) -> GameApplyResult {
        let result = self.apply(GameEvent::End);
        self.finish(result);
        result
    }

    /// Wrong gestures and gestures outside a running game leave state untouched.
    pub fn handle_match(&mut self, gesture: GestureCommand) -> GameApplyResult {
        let state = self.state();
        let next = (state.is_playing() && state.active_command == Some(gesture))
            .then(|| self.randomizer.next_command(Some(gesture)));
        let result = self.apply(GameEvent::Match { gesture, next });
        if result.changed() {
            telemetry::record_match(result.after.score);
            if result.ramped() {
                telemetry::record_ramp();
                debug!(
                    "game: ramp budget_ms={} score={}",
                    result.after.time_budget.as_millis(),
                    result.after.score
                );
            }
        }
        result
    }

    pub fn handle_timeout(&mut self) -> GameApplyResult {
        let result = self.apply(GameEvent::Timeout);
        if result.game_over() {
            telemetry::record_game_timed_out(result.after.score);
        }
        self.finish(result);
        result
    }

    /// What the randomizer would issue after the active command. Game state is untouched.
    pub fn next_command(&mut self) -> GestureCommand {
        let previous = self.state().active_command;
        self.randomizer.next_command(previous)
    }

    pub fn randomizer(&self) -> &R {
        &self.randomizer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn apply(&mut self, event: GameEvent) -> GameApplyResult {
        let before = self.state();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let after = self.state();
        GameApplyResult {
            before,
            after,
            status: context.status,
        }
    }

    fn finish(&mut self, result: GameApplyResult) {
        if !result.game_over() {
            return;
        }
        info!("game: over score={}", result.after.score);
        let Some(record) = result.new_high_score() else {
            return;
        };
        info!("game: new high score {}", record);
        if let Err(err) = self.store.save(record) {
            telemetry::record_store_write_failure();
            warn!("game: high score not persisted: {}", err);
        }
    }
}
