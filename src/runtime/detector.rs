use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use log::debug;

use crate::gesture::{DetectionSink, GestureClassifier, GestureCommand, MotionFeed, RotaryInput};

use super::channels::ClassifierControl;

/// What the orchestrator needs from a gesture detector.
pub trait DetectorControl {
    fn start(&mut self);
    fn stop(&mut self);
    fn arm(&mut self, command: Option<GestureCommand>, session: u32);
}

impl<T: DetectorControl + ?Sized> DetectorControl for &mut T {
    fn start(&mut self) {
        (**self).start();
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn arm(&mut self, command: Option<GestureCommand>, session: u32) {
        (**self).arm(command, session);
    }
}

impl<F, R, S> DetectorControl for GestureClassifier<F, R, S>
where
    F: MotionFeed,
    R: RotaryInput,
    S: DetectionSink,
{
    fn start(&mut self) {
        let _ = GestureClassifier::start(self);
    }

    fn stop(&mut self) {
        GestureClassifier::stop(self);
    }

    fn arm(&mut self, command: Option<GestureCommand>, session: u32) {
        self.arm_session(command, session);
    }
}

/// Publishes the desired classifier state to the classifier task. Each call
/// overwrites the pending value, so a burst of start/arm calls coalesces into
/// the latest one and nothing is dropped.
pub struct ClassifierLink<'a, M: RawMutex> {
    control: &'a Signal<M, ClassifierControl>,
    desired: ClassifierControl,
}

impl<'a, M: RawMutex> ClassifierLink<'a, M> {
    pub fn new(control: &'a Signal<M, ClassifierControl>) -> Self {
        Self {
            control,
            desired: ClassifierControl::IDLE,
        }
    }

    pub fn desired(&self) -> ClassifierControl {
        self.desired
    }

    fn publish(&mut self) {
        debug!("gesture: control {:?}", self.desired);
        self.control.signal(self.desired);
    }
}

impl<M: RawMutex> DetectorControl for ClassifierLink<'_, M> {
    fn start(&mut self) {
        self.desired.running = true;
        self.publish();
    }

    fn stop(&mut self) {
        self.desired.running = false;
        self.publish();
    }

    fn arm(&mut self, command: Option<GestureCommand>, session: u32) {
        self.desired.command = command;
        self.desired.session = session;
        self.publish();
    }
}
