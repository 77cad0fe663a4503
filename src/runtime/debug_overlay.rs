use core::fmt::Write as _;

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Sender};
use heapless::{String, Vec};
use log::warn;

use crate::gesture::{ClassifierTrace, DetectionSink, GestureCommand, GestureDetection, Vec3};

use super::channels::GameInput;

pub const OVERLAY_LINE_LEN: usize = 48;
pub const OVERLAY_LINES: usize = 6;

pub type OverlayLines = Vec<String<OVERLAY_LINE_LEN>, OVERLAY_LINES>;

/// Development overlay fed by the same sink callbacks as the game. It never
/// drives the classifier; manual triggers go through the game input queue.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DebugOverlayState {
    pub detector_active: bool,
    pub active_command: Option<GestureCommand>,
    pub last_detection: Option<GestureCommand>,
    pub acceleration: Option<Vec3>,
    pub rotation_rate: Option<Vec3>,
    pub crown_accumulated: f64,
    pub detections_seen: u32,
}

impl DebugOverlayState {
    pub const fn new() -> Self {
        Self {
            detector_active: false,
            active_command: None,
            last_detection: None,
            acceleration: None,
            rotation_rate: None,
            crown_accumulated: 0.0,
            detections_seen: 0,
        }
    }

    pub fn observe_trace(&mut self, trace: &ClassifierTrace) {
        self.detector_active = trace.running;
        self.active_command = trace.armed;
        self.crown_accumulated = trace.rotary_accumulated;
        if trace.last_acceleration.is_some() {
            self.acceleration = trace.last_acceleration;
        }
        if trace.last_rotation_rate.is_some() {
            self.rotation_rate = trace.last_rotation_rate;
        }
    }

    pub fn observe_detection(&mut self, detection: &GestureDetection) {
        self.last_detection = Some(detection.gesture);
        self.detections_seen = self.detections_seen.saturating_add(1);
    }

    pub fn render_lines(&self) -> OverlayLines {
        let mut lines = OverlayLines::new();

        push_line(&mut lines, |line| {
            write!(
                line,
                "Detector: {}",
                if self.detector_active { "On" } else { "Off" }
            )
        });
        push_line(&mut lines, |line| {
            write!(
                line,
                "Command: {}",
                self.active_command
                    .map(GestureCommand::display_name)
                    .unwrap_or("None")
            )
        });
        push_line(&mut lines, |line| {
            write!(
                line,
                "Last detection: {}",
                self.last_detection
                    .map(GestureCommand::display_name)
                    .unwrap_or("-")
            )
        });
        if let Some(acc) = self.acceleration {
            push_line(&mut lines, |line| {
                write!(line, "Accel x: {:.2} y: {:.2} z: {:.2}", acc.x, acc.y, acc.z)
            });
        }
        if let Some(rot) = self.rotation_rate {
            push_line(&mut lines, |line| {
                write!(line, "Gyro  x: {:.2} y: {:.2} z: {:.2}", rot.x, rot.y, rot.z)
            });
        }
        push_line(&mut lines, |line| {
            write!(line, "Crown delta: {:.2}", self.crown_accumulated)
        });

        lines
    }
}

impl DetectionSink for DebugOverlayState {
    fn on_detection(&mut self, detection: GestureDetection) {
        self.observe_detection(&detection);
    }

    fn on_trace(&mut self, trace: &ClassifierTrace) {
        self.observe_trace(trace);
    }
}

/// Button caption for a manual trigger, e.g. "Shake" for "Shake it!".
pub fn manual_trigger_label(gesture: GestureCommand) -> &'static str {
    let name = gesture.display_name();
    name.strip_suffix(" it!").unwrap_or(name)
}

pub fn request_manual_trigger<M: RawMutex, const N: usize>(
    sender: Sender<'_, M, GameInput, N>,
    gesture: GestureCommand,
) -> bool {
    let sent = sender.try_send(GameInput::ManualTrigger(gesture)).is_ok();
    if !sent {
        warn!("overlay: manual {} dropped, queue full", gesture.label());
    }
    sent
}

fn push_line(
    lines: &mut OverlayLines,
    render: impl FnOnce(&mut String<OVERLAY_LINE_LEN>) -> core::fmt::Result,
) {
    let mut line = String::new();
    // Overlong lines keep whatever fit before the capacity was reached.
    let _ = render(&mut line);
    let _ = lines.push(line);
}
