use embassy_time::{Duration, Instant};

use crate::config::DetectorConfig;

use super::types::{GestureCommand, MotionSample};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PeakAssessment {
    Quiet,
    Debounced,
    Peak,
}

pub(crate) fn abs_f32(value: f32) -> f32 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

pub(crate) fn abs_f64(value: f64) -> f64 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

/// Compares squared magnitudes so no square root is needed on the sampling path.
pub fn shake_magnitude_reached(sample: &MotionSample, cfg: &DetectorConfig) -> bool {
    let threshold = cfg.shake.acceleration_threshold;
    sample.acceleration.magnitude_squared() >= threshold * threshold
}

pub fn assess_shake_peak(
    sample: &MotionSample,
    last_peak_at: Option<Instant>,
    cfg: &DetectorConfig,
) -> PeakAssessment {
    if !shake_magnitude_reached(sample, cfg) {
        return PeakAssessment::Quiet;
    }

    let separation = Duration::from_millis(cfg.shake.peak_separation_ms);
    let debounced = last_peak_at.is_some_and(|last| {
        sample
            .at
            .checked_duration_since(last)
            .is_none_or(|elapsed| elapsed < separation)
    });
    if debounced {
        PeakAssessment::Debounced
    } else {
        PeakAssessment::Peak
    }
}

pub fn shake_peaks_sufficient(peak_count: usize, cfg: &DetectorConfig) -> bool {
    peak_count >= usize::from(cfg.shake.peaks_required)
}

pub fn detects_flick_up(sample: &MotionSample, cfg: &DetectorConfig) -> bool {
    sample.acceleration.y >= cfg.flick_up.acceleration_threshold
}

pub fn detects_twist(sample: &MotionSample, cfg: &DetectorConfig) -> bool {
    abs_f32(sample.rotation_rate.z) >= cfg.twist.rotation_threshold
}

pub fn crown_threshold_reached(accumulated_delta: f64, cfg: &DetectorConfig) -> bool {
    accumulated_delta >= cfg.spin_crown.delta_threshold
}

/// Single-sample commands fire on the sample that crosses their threshold.
pub fn detects_instant(
    command: GestureCommand,
    sample: &MotionSample,
    cfg: &DetectorConfig,
) -> bool {
    match command {
        GestureCommand::FlickUp => detects_flick_up(sample, cfg),
        GestureCommand::Twist => detects_twist(sample, cfg),
        GestureCommand::Shake | GestureCommand::SpinCrown => false,
    }
}
