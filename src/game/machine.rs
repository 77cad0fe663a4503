use statig::prelude::*;

use crate::{config::GameplayConfig, gesture::GestureCommand};

use super::actions::GameApplyStatus;
use super::events::GameEvent;
use super::snapshot::GameState;

pub(super) struct GameMachine {
    config: &'static GameplayConfig,
    pub(super) state: GameState,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) status: GameApplyStatus,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: GameApplyStatus::Unchanged,
        }
    }
}

impl GameMachine {
    pub(super) fn new(config: &'static GameplayConfig, high_score: u32) -> Self {
        Self {
            config,
            state: GameState::fresh(config, high_score),
        }
    }

    fn begin(&mut self, high_score: u32, first: GestureCommand) {
        let carried = self.state.high_score.max(high_score);
        self.state = GameState {
            active_command: Some(first),
            is_running: true,
            ..GameState::fresh(self.config, carried)
        };
    }

    fn accept_match(&mut self, next: GestureCommand) {
        let state = &mut self.state;
        state.score = state.score.saturating_add(1);
        state.streak_since_ramp = state.streak_since_ramp.saturating_add(1);
        state.just_ramped = false;

        if state.streak_since_ramp >= self.config.successes_per_ramp {
            state.streak_since_ramp = 0;
            let previous = state.time_budget;
            let lowered = previous
                .checked_sub(self.config.time_decrement())
                .unwrap_or(self.config.minimum_time_budget());
            state.time_budget = lowered.max(self.config.minimum_time_budget());
            state.just_ramped = state.time_budget < previous;
        }

        state.active_command = Some(next);
    }

    fn finish(&mut self) {
        let state = &mut self.state;
        state.is_over = true;
        state.is_running = false;
        state.active_command = None;
        state.just_ramped = false;
        if state.score > state.high_score {
            state.high_score = state.score;
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl GameMachine {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &GameEvent) -> Outcome<State> {
        match *event {
            GameEvent::Start { high_score, first } => {
                self.begin(high_score, first);
                context.status = GameApplyStatus::Applied;
                Transition(State::playing())
            }
            _ => {
                context.status = GameApplyStatus::InvalidTransition;
                Handled
            }
        }
    }

    #[state]
    fn playing(&mut self, context: &mut DispatchContext, event: &GameEvent) -> Outcome<State> {
        match *event {
            GameEvent::Start { high_score, first } => {
                self.begin(high_score, first);
                context.status = GameApplyStatus::Applied;
                Handled
            }
            GameEvent::Match { gesture, next } => {
                match next {
                    Some(next) if self.state.active_command == Some(gesture) => {
                        self.accept_match(next);
                        context.status = GameApplyStatus::Applied;
                    }
                    _ => context.status = GameApplyStatus::Unchanged,
                }
                Handled
            }
            GameEvent::Timeout | GameEvent::End => {
                self.finish();
                context.status = GameApplyStatus::Applied;
                Transition(State::ended())
            }
        }
    }

    #[state]
    fn ended(&mut self, context: &mut DispatchContext, event: &GameEvent) -> Outcome<State> {
        match *event {
            GameEvent::Start { high_score, first } => {
                self.begin(high_score, first);
                context.status = GameApplyStatus::Applied;
                Transition(State::playing())
            }
            GameEvent::End => {
                context.status = GameApplyStatus::Unchanged;
                Handled
            }
            GameEvent::Match { .. } | GameEvent::Timeout => {
                context.status = GameApplyStatus::InvalidTransition;
                Handled
            }
        }
    }
}
