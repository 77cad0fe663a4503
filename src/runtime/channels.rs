use embassy_sync::{
    blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex},
    channel::Channel,
    signal::Signal,
};
use log::warn;

use crate::{
    gesture::{DetectionSink, GestureCommand, GestureDetection, MotionSample},
    telemetry,
};

pub const CLASSIFIER_INPUT_CAPACITY: usize = 32;
pub const GAME_INPUT_CAPACITY: usize = 8;

/// Sensor data for the classifier task. Producers drop samples when the
/// queue is full; control never travels here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClassifierInput {
    Motion(MotionSample),
    RotaryDelta(f64),
    Shutdown,
}

/// Desired classifier state. Only the latest value matters, so it is carried
/// in a `Signal` that overwrites instead of a queue that can fill up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifierControl {
    pub running: bool,
    pub command: Option<GestureCommand>,
    pub session: u32,
}

impl ClassifierControl {
    pub const IDLE: Self = Self {
        running: false,
        command: None,
        session: 0,
    };
}

impl Default for ClassifierControl {
    fn default() -> Self {
        Self::IDLE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameInput {
    Start,
    Reset,
    End,
    Detection(GestureDetection),
    ManualTrigger(GestureCommand),
    Shutdown,
}

pub type ClassifierInputChannel =
    Channel<CriticalSectionRawMutex, ClassifierInput, CLASSIFIER_INPUT_CAPACITY>;
pub type ClassifierControlSignal = Signal<CriticalSectionRawMutex, ClassifierControl>;
pub type GameInputChannel = Channel<CriticalSectionRawMutex, GameInput, GAME_INPUT_CAPACITY>;
pub type DetectionSignal = Signal<CriticalSectionRawMutex, GestureDetection>;

pub static CLASSIFIER_INPUTS: ClassifierInputChannel = Channel::new();
pub static CLASSIFIER_CONTROL: ClassifierControlSignal = Signal::new();
pub static GAME_INPUTS: GameInputChannel = Channel::new();
pub static DETECTIONS: DetectionSignal = Signal::new();

/// Hands detections from the classifier task to the game loop. At most one
/// detection per session exists, so a pending one is only ever replaced by a
/// newer session's detection.
pub struct SignalDetectionSink<'a, M: RawMutex> {
    signal: &'a Signal<M, GestureDetection>,
}

impl<'a, M: RawMutex> SignalDetectionSink<'a, M> {
    pub fn new(signal: &'a Signal<M, GestureDetection>) -> Self {
        Self { signal }
    }
}

impl<M: RawMutex> DetectionSink for SignalDetectionSink<'_, M> {
    fn on_detection(&mut self, detection: GestureDetection) {
        if self.signal.signaled() {
            telemetry::record_detection_superseded();
            warn!(
                "gesture: pending detection replaced by {} session={}",
                detection.gesture.label(),
                detection.session
            );
        }
        self.signal.signal(detection);
    }
}
