use heapless::Vec;

use super::{trace::ClassifierTrace, types::GestureDetection};

pub trait DetectionSink {
    fn on_detection(&mut self, detection: GestureDetection);

    fn on_trace(&mut self, _trace: &ClassifierTrace) {}
}

impl<T: DetectionSink + ?Sized> DetectionSink for &mut T {
    fn on_detection(&mut self, detection: GestureDetection) {
        (**self).on_detection(detection);
    }

    fn on_trace(&mut self, trace: &ClassifierTrace) {
        (**self).on_trace(trace);
    }
}

/// Fans every callback out to both sinks, first then second.
impl<A: DetectionSink, B: DetectionSink> DetectionSink for (A, B) {
    fn on_detection(&mut self, detection: GestureDetection) {
        self.0.on_detection(detection);
        self.1.on_detection(detection);
    }

    fn on_trace(&mut self, trace: &ClassifierTrace) {
        self.0.on_trace(trace);
        self.1.on_trace(trace);
    }
}

/// Bounded in-memory sink for host replay and tests.
#[derive(Debug, Default)]
pub struct DetectionLog<const N: usize> {
    detections: Vec<GestureDetection, N>,
    last_trace: Option<ClassifierTrace>,
    dropped: u32,
}

impl<const N: usize> DetectionLog<N> {
    pub const fn new() -> Self {
        Self {
            detections: Vec::new(),
            last_trace: None,
            dropped: 0,
        }
    }

    pub fn detections(&self) -> &[GestureDetection] {
        &self.detections
    }

    pub fn last_trace(&self) -> Option<&ClassifierTrace> {
        self.last_trace.as_ref()
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.detections.clear();
        self.dropped = 0;
    }
}

impl<const N: usize> DetectionSink for DetectionLog<N> {
    fn on_detection(&mut self, detection: GestureDetection) {
        if self.detections.push(detection).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }

    fn on_trace(&mut self, trace: &ClassifierTrace) {
        self.last_trace = Some(*trace);
    }
}
