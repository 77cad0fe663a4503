//! Recorded gesture traces and their replay through the classifier.

use std::{fs, path::Path};

use embassy_time::Instant;
use wristbop::{
    config::active_config,
    gesture::{
        DetectionLog, GestureClassifier, GestureCommand, GestureDetection, MotionSample,
        NoRotaryInput, UnavailableMotionFeed, Vec3,
    },
};

pub const MAX_DETECTIONS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraceStep {
    Arm(Option<GestureCommand>),
    Motion(MotionSample),
    Crown(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReplayOutcome {
    pub detections: Vec<GestureDetection>,
    pub last_sample_ms: u64,
}

impl ReplayOutcome {
    pub fn labels(&self) -> Vec<&'static str> {
        self.detections.iter().map(|d| d.gesture.label()).collect()
    }
}

pub fn parse_trace(path: &Path) -> Result<Vec<TraceStep>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    parse_trace_str(&text, &path.display().to_string())
}

/// `origin` prefixes error locations, usually the trace path.
pub fn parse_trace_str(text: &str, origin: &str) -> Result<Vec<TraceStep>, String> {
    let mut out: Vec<TraceStep> = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let step = match parts[0] {
            "arm" => {
                let Some(token) = parts.get(1) else {
                    return Err(format!("{origin}:{line_no} arm needs a gesture"));
                };
                if token.eq_ignore_ascii_case("none") {
                    TraceStep::Arm(None)
                } else {
                    let gesture = parse_gesture(token).ok_or_else(|| {
                        format!("{origin}:{line_no} unknown gesture: {token}")
                    })?;
                    TraceStep::Arm(Some(gesture))
                }
            }
            "m" => {
                if parts.len() != 8 {
                    return Err(format!(
                        "{origin}:{line_no} invalid motion line, expected t_ms and 6 axes"
                    ));
                }
                let ms: u64 = parse_field(parts[1], origin, line_no, "t_ms")?;
                let mut axes = [0.0f32; 6];
                for (idx, axis) in axes.iter_mut().enumerate() {
                    *axis = parse_field(parts[2 + idx], origin, line_no, "axis")?;
                }
                TraceStep::Motion(MotionSample::new(
                    Vec3::new(axes[0], axes[1], axes[2]),
                    Vec3::new(axes[3], axes[4], axes[5]),
                    Instant::from_millis(ms),
                ))
            }
            "crown" => {
                let Some(raw) = parts.get(1) else {
                    return Err(format!("{origin}:{line_no} crown needs a delta"));
                };
                TraceStep::Crown(parse_field(raw, origin, line_no, "delta")?)
            }
            other => return Err(format!("{origin}:{line_no} unknown step: {other}")),
        };
        out.push(step);
    }

    Ok(out)
}

/// Runs `steps` through a classifier with the compiled detector config.
pub fn replay(steps: &[TraceStep]) -> Result<ReplayOutcome, String> {
    // Replays feed samples directly, so no live motion source is needed.
    let mut classifier = GestureClassifier::new(
        &active_config().detector,
        UnavailableMotionFeed,
        NoRotaryInput,
        DetectionLog::<MAX_DETECTIONS>::new(),
    );

    let mut last_sample_ms = 0u64;
    for step in steps {
        match *step {
            TraceStep::Arm(command) => {
                let _ = classifier.arm(command);
            }
            TraceStep::Motion(sample) => {
                last_sample_ms = sample.at.as_millis();
                classifier.ingest(sample);
            }
            TraceStep::Crown(delta) => classifier.ingest_rotary_delta(delta),
        }
    }

    let log = classifier.sink();
    if log.dropped() > 0 {
        return Err(format!(
            "{} detections exceeded the replay log capacity",
            log.dropped()
        ));
    }

    Ok(ReplayOutcome {
        detections: log.detections().to_vec(),
        last_sample_ms,
    })
}

/// Parses `--expect` values: a comma list of gesture labels or `none`.
pub fn parse_expected(value: &str) -> Result<Vec<&'static str>, String> {
    if value.trim().eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|token| {
            parse_gesture(token)
                .map(GestureCommand::label)
                .ok_or_else(|| format!("invalid expected gesture: {}", token.trim()))
        })
        .collect()
}

pub fn render_list(labels: &[&str]) -> String {
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(",")
    }
}

fn parse_gesture(token: &str) -> Option<GestureCommand> {
    GestureCommand::from_label(&token.trim().to_ascii_lowercase())
}

fn parse_field<T>(raw: &str, origin: &str, line_no: usize, field: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| format!("{origin}:{line_no} invalid {field} '{}': {e}", raw.trim()))
}
