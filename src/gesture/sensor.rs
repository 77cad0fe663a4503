use embassy_time::Duration;

/// Source of fused device-motion samples. Samples themselves are pushed
/// into the classifier by whoever owns the sensor task.
pub trait MotionFeed {
    fn is_available(&self) -> bool;
    fn set_update_interval(&mut self, interval: Duration);
    fn start(&mut self);
    fn stop(&mut self);
}

/// Rotary crown focus. Deltas arrive through `GestureClassifier::ingest_rotary_delta`.
pub trait RotaryInput {
    fn focus(&mut self);
    fn resign_focus(&mut self);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableMotionFeed;

impl MotionFeed for UnavailableMotionFeed {
    fn is_available(&self) -> bool {
        false
    }

    fn set_update_interval(&mut self, _interval: Duration) {}

    fn start(&mut self) {}

    fn stop(&mut self) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoRotaryInput;

impl RotaryInput for NoRotaryInput {
    fn focus(&mut self) {}

    fn resign_focus(&mut self) {}
}
