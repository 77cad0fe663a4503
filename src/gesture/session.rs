use embassy_time::{Duration, Instant};
use heapless::Deque;

use super::types::MotionSample;

pub const SAMPLE_WINDOW_CAPACITY: usize = 64;
pub const SHAKE_PEAK_CAPACITY: usize = 16;

/// Per-arm detector buffers. Everything here is discarded when a new
/// command is armed or the classifier stops.
pub struct ClassifierSession {
    samples: Deque<MotionSample, SAMPLE_WINDOW_CAPACITY>,
    shake_peaks: Deque<Instant, SHAKE_PEAK_CAPACITY>,
    rotary_accumulated: f64,
    emitted: bool,
}

impl Default for ClassifierSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierSession {
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
            shake_peaks: Deque::new(),
            rotary_accumulated: 0.0,
            emitted: false,
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.shake_peaks.clear();
        self.rotary_accumulated = 0.0;
        self.emitted = false;
    }

    pub fn push_sample(&mut self, sample: MotionSample, window: Duration) {
        if self.samples.is_full() {
            let _ = self.samples.pop_front();
        }
        let _ = self.samples.push_back(sample);
        self.prune(sample.at, window);
    }

    /// Drops samples and peaks strictly older than `now - window`.
    pub fn prune(&mut self, now: Instant, window: Duration) {
        let Some(cutoff) = now.checked_sub(window) else {
            return;
        };
        while self.samples.front().is_some_and(|s| s.at < cutoff) {
            let _ = self.samples.pop_front();
        }
        while self.shake_peaks.front().is_some_and(|at| *at < cutoff) {
            let _ = self.shake_peaks.pop_front();
        }
    }

    pub fn record_peak(&mut self, at: Instant) {
        if self.shake_peaks.is_full() {
            let _ = self.shake_peaks.pop_front();
        }
        let _ = self.shake_peaks.push_back(at);
    }

    pub fn last_peak(&self) -> Option<Instant> {
        self.shake_peaks.back().copied()
    }

    pub fn peak_count(&self) -> usize {
        self.shake_peaks.len()
    }

    pub fn window_len(&self) -> usize {
        self.samples.len()
    }

    pub fn add_rotary(&mut self, magnitude: f64) -> f64 {
        self.rotary_accumulated += magnitude;
        self.rotary_accumulated
    }

    pub fn rotary_accumulated(&self) -> f64 {
        self.rotary_accumulated
    }

    pub fn mark_emitted(&mut self) {
        self.emitted = true;
    }

    pub fn emitted(&self) -> bool {
        self.emitted
    }
}
