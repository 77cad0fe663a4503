use log::{debug, warn};

use crate::{config::DetectorConfig, telemetry};

use super::{
    features::{
        abs_f64, assess_shake_peak, crown_threshold_reached, detects_instant,
        shake_peaks_sufficient, PeakAssessment,
    },
    sensor::{MotionFeed, RotaryInput},
    session::ClassifierSession,
    sink::DetectionSink,
    trace::ClassifierTrace,
    types::{DetectionSource, GestureCommand, GestureDetection, MotionSample},
};

/// Watches a single armed command and reports it at most once per session.
pub struct GestureClassifier<F, R, S> {
    config: &'static DetectorConfig,
    motion: F,
    rotary: R,
    sink: S,
    armed: Option<GestureCommand>,
    session_id: u32,
    session: ClassifierSession,
    running: bool,
    last_sample: Option<MotionSample>,
    last_detection: Option<GestureCommand>,
}

impl<F, R, S> GestureClassifier<F, R, S>
where
    F: MotionFeed,
    R: RotaryInput,
    S: DetectionSink,
{
    pub fn new(config: &'static DetectorConfig, motion: F, rotary: R, sink: S) -> Self {
        Self {
            config,
            motion,
            rotary,
            sink,
            armed: None,
            session_id: 0,
            session: ClassifierSession::new(),
            running: false,
            last_sample: None,
            last_detection: None,
        }
    }

    /// Returns `false` when the motion feed is unavailable; the classifier
    /// then stays silent for motion commands.
    pub fn start(&mut self) -> bool {
        if self.running {
            return true;
        }
        if !self.motion.is_available() {
            warn!("gesture: motion feed unavailable, detector stays silent");
            telemetry::record_sensor_unavailable();
            return false;
        }
        self.motion
            .set_update_interval(self.config.motion_update_interval());
        self.motion.start();
        self.rotary.focus();
        self.running = true;
        debug!("gesture: detector started");
        self.publish_trace();
        true
    }

    pub fn stop(&mut self) {
        if self.running {
            self.motion.stop();
            self.rotary.resign_focus();
            self.running = false;
            debug!("gesture: detector stopped");
        }
        self.session.clear();
        self.publish_trace();
    }

    /// Arms `command` under a fresh session id and returns that id.
    pub fn arm(&mut self, command: Option<GestureCommand>) -> u32 {
        let session = self.session_id.wrapping_add(1);
        self.arm_session(command, session);
        session
    }

    /// Arms `command` under a session id chosen by the caller.
    pub fn arm_session(&mut self, command: Option<GestureCommand>, session: u32) {
        self.armed = command;
        self.session_id = session;
        self.session.clear();
        match command {
            Some(command) => debug!("gesture: armed {} session={}", command.label(), session),
            None => debug!("gesture: disarmed session={}", session),
        }
        self.publish_trace();
    }

    pub fn ingest(&mut self, sample: MotionSample) {
        let Some(command) = self.armed else {
            return;
        };
        if self.session.emitted() {
            return;
        }

        self.last_sample = Some(sample);
        self.session.push_sample(sample, self.config.sample_window());

        let detected = match command {
            GestureCommand::Shake => self.observe_shake(&sample),
            GestureCommand::SpinCrown => false,
            GestureCommand::FlickUp | GestureCommand::Twist => {
                detects_instant(command, &sample, self.config)
            }
        };

        if detected {
            self.emit(command, DetectionSource::Motion);
        } else {
            self.publish_trace();
        }
    }

    pub fn ingest_rotary_delta(&mut self, delta: f64) {
        if self.armed != Some(GestureCommand::SpinCrown) || self.session.emitted() {
            return;
        }

        let accumulated = self.session.add_rotary(abs_f64(delta));
        if crown_threshold_reached(accumulated, self.config) {
            self.emit(GestureCommand::SpinCrown, DetectionSource::Rotary);
        } else {
            self.publish_trace();
        }
    }

    pub fn armed(&self) -> Option<GestureCommand> {
        self.armed
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_emitted(&self) -> bool {
        self.session.emitted()
    }

    pub fn trace(&self) -> ClassifierTrace {
        ClassifierTrace {
            armed: self.armed,
            session: self.session_id,
            running: self.running,
            window_len: self.session.window_len().min(u8::MAX as usize) as u8,
            shake_peaks: self.session.peak_count().min(u8::MAX as usize) as u8,
            rotary_accumulated: self.session.rotary_accumulated(),
            last_acceleration: self.last_sample.map(|s| s.acceleration),
            last_rotation_rate: self.last_sample.map(|s| s.rotation_rate),
            last_detection: self.last_detection,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn observe_shake(&mut self, sample: &MotionSample) -> bool {
        match assess_shake_peak(sample, self.session.last_peak(), self.config) {
            PeakAssessment::Peak => {
                self.session.record_peak(sample.at);
                shake_peaks_sufficient(self.session.peak_count(), self.config)
            }
            PeakAssessment::Debounced | PeakAssessment::Quiet => false,
        }
    }

    fn emit(&mut self, gesture: GestureCommand, source: DetectionSource) {
        let detection = GestureDetection {
            gesture,
            session: self.session_id,
            source,
        };
        self.session.clear();
        self.session.mark_emitted();
        self.last_detection = Some(gesture);
        telemetry::record_detection(gesture);
        debug!(
            "gesture: detected {} session={}",
            gesture.label(),
            self.session_id
        );
        self.sink.on_detection(detection);
        self.publish_trace();
    }

    fn publish_trace(&mut self) {
        let trace = self.trace();
        self.sink.on_trace(&trace);
    }
}
