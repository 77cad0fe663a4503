use embassy_time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct GameplayConfig {
    pub initial_time_budget_ms: u64,
    pub minimum_time_budget_ms: u64,
    pub time_decrement_ms: u64,
    pub successes_per_ramp: u8,
}

impl GameplayConfig {
    pub const fn initial_time_budget(&self) -> Duration {
        Duration::from_millis(self.initial_time_budget_ms)
    }

    pub const fn minimum_time_budget(&self) -> Duration {
        Duration::from_millis(self.minimum_time_budget_ms)
    }

    pub const fn time_decrement(&self) -> Duration {
        Duration::from_millis(self.time_decrement_ms)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ShakeConfig {
    pub acceleration_threshold: f32,
    pub peak_separation_ms: u64,
    pub peaks_required: u8,
}

#[derive(Clone, Copy, Debug)]
pub struct FlickUpConfig {
    pub acceleration_threshold: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct TwistConfig {
    pub rotation_threshold: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct SpinCrownConfig {
    pub delta_threshold: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    pub motion_update_interval_ms: u64,
    pub sample_window_ms: u64,
    pub shake: ShakeConfig,
    pub flick_up: FlickUpConfig,
    pub twist: TwistConfig,
    pub spin_crown: SpinCrownConfig,
}

impl DetectorConfig {
    pub const fn sample_window(&self) -> Duration {
        Duration::from_millis(self.sample_window_ms)
    }

    pub const fn motion_update_interval(&self) -> Duration {
        Duration::from_millis(self.motion_update_interval_ms)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TimingConfig {
    pub tick_interval_ms: u64,
    pub speed_up_pause_ms: u64,
}

impl TimingConfig {
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub const fn speed_up_pause(&self) -> Duration {
        Duration::from_millis(self.speed_up_pause_ms)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub gameplay: GameplayConfig,
    pub detector: DetectorConfig,
    pub timing: TimingConfig,
}

include!(concat!(env!("OUT_DIR"), "/game_config.rs"));

pub fn active_config() -> &'static GameConfig {
    &GAME_CONFIG
}
