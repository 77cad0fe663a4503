use embassy_time::{Duration, Instant};
use log::{debug, info, warn};

use crate::{
    config::TimingConfig,
    game::{CommandRandomizer, GameApplyResult, GameEngine, GameState, HighScoreStore},
    gesture::{GestureCommand, GestureDetection},
    telemetry,
};

use super::{
    countdown::{CountdownEvent, CountdownTimer},
    detector::DetectorControl,
    feedback::{FeedbackEvent, FeedbackSink},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OrchestratorPhase {
    Idle,
    Running,
    SpeedUpPause { resume_at: Instant },
    GameOver,
}

/// Sequences the engine, the countdown, the detector and feedback on the
/// single control context. Every entry point takes the current instant so
/// the caller owns the clock.
pub struct GameOrchestrator<R, S, T, F, D> {
    engine: GameEngine<R, S>,
    timer: T,
    feedback: F,
    detector: D,
    timing: &'static TimingConfig,
    phase: OrchestratorPhase,
    session: u32,
    remaining: Option<Duration>,
}

impl<R, S, T, F, D> GameOrchestrator<R, S, T, F, D>
where
    R: CommandRandomizer,
    S: HighScoreStore,
    T: CountdownTimer,
    F: FeedbackSink,
    D: DetectorControl,
{
    pub fn new(
        engine: GameEngine<R, S>,
        timer: T,
        feedback: F,
        detector: D,
        timing: &'static TimingConfig,
    ) -> Self {
        Self {
            engine,
            timer,
            feedback,
            detector,
            timing,
            phase: OrchestratorPhase::Idle,
            session: 0,
            remaining: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    pub fn phase(&self) -> OrchestratorPhase {
        self.phase
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    /// Remaining time reported by the most recent countdown tick.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    pub fn engine(&self) -> &GameEngine<R, S> {
        &self.engine
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn start_game(&mut self, now: Instant) -> GameApplyResult {
        self.timer.cancel();
        let result = self.engine.start();
        self.detector.start();
        self.phase = OrchestratorPhase::Running;
        self.arm_active(now);
        self.feedback.play(FeedbackEvent::Tick);
        result
    }

    /// Restarts immediately from any phase; a pending speed-up resume is discarded.
    pub fn reset_game(&mut self, now: Instant) -> GameApplyResult {
        info!("game: reset");
        self.start_game(now)
    }

    pub fn end_game(&mut self, _now: Instant) -> GameApplyResult {
        self.timer.cancel();
        let result = self.engine.end();
        self.shut_detector();
        if result.changed() {
            self.phase = OrchestratorPhase::GameOver;
        }
        result
    }

    pub fn on_detection(
        &mut self,
        detection: GestureDetection,
        now: Instant,
    ) -> Option<GameApplyResult> {
        if detection.session != self.session {
            telemetry::record_stale_detection();
            warn!(
                "game: stale detection {} session={} current={}",
                detection.gesture.label(),
                detection.session,
                self.session
            );
            return None;
        }
        self.apply_gesture(detection.gesture, now)
    }

    /// Manual trigger from the debug overlay; treated like a detection of the current session.
    pub fn trigger_manual(
        &mut self,
        gesture: GestureCommand,
        now: Instant,
    ) -> Option<GameApplyResult> {
        self.apply_gesture(gesture, now)
    }

    /// Advances pause and countdown state. Returns the countdown event, if any.
    pub fn poll(&mut self, now: Instant) -> Option<CountdownEvent> {
        match self.phase {
            OrchestratorPhase::SpeedUpPause { resume_at } => {
                if now >= resume_at {
                    debug!("game: speed-up pause over");
                    self.phase = OrchestratorPhase::Running;
                    self.arm_active(now);
                }
                None
            }
            OrchestratorPhase::Running => {
                let event = self.timer.poll(now)?;
                match event {
                    CountdownEvent::Tick { remaining } => self.remaining = Some(remaining),
                    CountdownEvent::Timeout => self.on_timeout(),
                }
                Some(event)
            }
            OrchestratorPhase::Idle | OrchestratorPhase::GameOver => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            OrchestratorPhase::Running => self.timer.deadline(),
            OrchestratorPhase::SpeedUpPause { resume_at } => Some(resume_at),
            OrchestratorPhase::Idle | OrchestratorPhase::GameOver => None,
        }
    }

    fn apply_gesture(&mut self, gesture: GestureCommand, now: Instant) -> Option<GameApplyResult> {
        if self.phase != OrchestratorPhase::Running {
            debug!(
                "game: {} ignored in phase {:?}",
                gesture.label(),
                self.phase
            );
            return None;
        }

        let result = self.engine.handle_match(gesture);
        if !result.changed() {
            return Some(result);
        }

        self.feedback.play(FeedbackEvent::Success);
        if result.ramped() {
            self.timer.cancel();
            self.disarm();
            self.feedback.play(FeedbackEvent::SpeedUp);
            self.phase = OrchestratorPhase::SpeedUpPause {
                resume_at: now + self.timing.speed_up_pause(),
            };
        } else {
            self.arm_active(now);
        }
        Some(result)
    }

    fn on_timeout(&mut self) {
        let result = self.engine.handle_timeout();
        self.shut_detector();
        self.remaining = None;
        if result.changed() {
            self.feedback.play(FeedbackEvent::Failure);
        }
        self.phase = OrchestratorPhase::GameOver;
    }

    fn arm_active(&mut self, now: Instant) {
        let state = self.engine.state();
        self.session = self.session.wrapping_add(1);
        self.detector.arm(state.active_command, self.session);
        self.timer
            .start(now, state.time_budget, self.timing.tick_interval());
        self.remaining = Some(state.time_budget);
    }

    fn disarm(&mut self) {
        self.session = self.session.wrapping_add(1);
        self.detector.arm(None, self.session);
    }

    fn shut_detector(&mut self) {
        self.disarm();
        self.detector.stop();
    }
}
