use embassy_time::Duration;

use crate::{config::GameplayConfig, gesture::GestureCommand};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum GamePhase {
    Idle = 0,
    Playing = 1,
    Ended = 2,
}

/// Authoritative game state. Only the engine's state machine writes it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameState {
    pub active_command: Option<GestureCommand>,
    pub score: u32,
    pub high_score: u32,
    pub time_budget: Duration,
    pub is_over: bool,
    pub is_running: bool,
    pub streak_since_ramp: u8,
    pub just_ramped: bool,
}

impl GameState {
    pub const fn fresh(config: &GameplayConfig, high_score: u32) -> Self {
        Self {
            active_command: None,
            score: 0,
            high_score,
            time_budget: config.initial_time_budget(),
            is_over: false,
            is_running: false,
            streak_since_ramp: 0,
            just_ramped: false,
        }
    }

    pub const fn phase(&self) -> GamePhase {
        if self.is_over {
            GamePhase::Ended
        } else if self.is_running {
            GamePhase::Playing
        } else {
            GamePhase::Idle
        }
    }

    pub const fn is_playing(&self) -> bool {
        self.is_running && !self.is_over
    }

    pub fn time_budget_secs(&self) -> f32 {
        self.time_budget.as_millis() as f32 / 1000.0
    }
}
