use std::{fmt, fmt::Write as _, fs, path::Path};

use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GameFile {
    pub gameplay: GameplaySection,
    pub detector: DetectorSection,
    pub timing: TimingSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GameplaySection {
    pub initial_time_budget_ms: u64,
    pub minimum_time_budget_ms: u64,
    pub time_decrement_ms: u64,
    pub successes_per_ramp: u8,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DetectorSection {
    pub motion_update_interval_ms: u64,
    pub sample_window_ms: u64,
    pub shake: ShakeSection,
    pub flick_up: FlickUpSection,
    pub twist: TwistSection,
    pub spin_crown: SpinCrownSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ShakeSection {
    pub acceleration_threshold: f32,
    pub peak_separation_ms: u64,
    pub peaks_required: u8,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FlickUpSection {
    pub acceleration_threshold: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TwistSection {
    pub rotation_threshold: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpinCrownSection {
    pub delta_threshold: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TimingSection {
    pub tick_interval_ms: u64,
    pub speed_up_pause_ms: u64,
}

pub fn parse_game_file(path: &Path) -> Result<GameFile, ConfigCompilerError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_game_str(&raw)
}

pub fn parse_game_str(raw: &str) -> Result<GameFile, ConfigCompilerError> {
    toml::from_str(raw).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn validate_config(file: &GameFile) -> Result<(), ConfigCompilerError> {
    let gameplay = &file.gameplay;
    if gameplay.initial_time_budget_ms == 0 {
        return invalid("gameplay.initial_time_budget_ms must be > 0");
    }
    if gameplay.minimum_time_budget_ms == 0 {
        return invalid("gameplay.minimum_time_budget_ms must be > 0");
    }
    if gameplay.minimum_time_budget_ms > gameplay.initial_time_budget_ms {
        return invalid(
            "gameplay.minimum_time_budget_ms must be <= gameplay.initial_time_budget_ms",
        );
    }
    if gameplay.time_decrement_ms == 0 {
        return invalid("gameplay.time_decrement_ms must be > 0");
    }
    if gameplay.successes_per_ramp == 0 {
        return invalid("gameplay.successes_per_ramp must be >= 1");
    }

    let detector = &file.detector;
    if detector.motion_update_interval_ms == 0 {
        return invalid("detector.motion_update_interval_ms must be > 0");
    }
    if detector.sample_window_ms == 0 {
        return invalid("detector.sample_window_ms must be > 0");
    }
    let thresholds = [
        f64::from(detector.shake.acceleration_threshold),
        f64::from(detector.flick_up.acceleration_threshold),
        f64::from(detector.twist.rotation_threshold),
        detector.spin_crown.delta_threshold,
    ];
    if thresholds.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return invalid("all detector thresholds must be finite and positive");
    }
    if detector.shake.peaks_required == 0 {
        return invalid("detector.shake.peaks_required must be >= 1");
    }
    if detector.shake.peak_separation_ms >= detector.sample_window_ms {
        return invalid("detector.shake.peak_separation_ms must be < detector.sample_window_ms");
    }

    if file.timing.tick_interval_ms == 0 {
        return invalid("timing.tick_interval_ms must be > 0");
    }
    if file.timing.speed_up_pause_ms == 0 {
        return invalid("timing.speed_up_pause_ms must be > 0");
    }

    Ok(())
}

fn invalid(msg: &str) -> Result<(), ConfigCompilerError> {
    Err(ConfigCompilerError::Validation(msg.to_owned()))
}

pub fn render_generated_config(file: &GameFile) -> String {
    let gameplay = &file.gameplay;
    let detector = &file.detector;
    let timing = &file.timing;

    let mut out = String::new();
    out.push_str("// @generated by game_config_compiler. Do not edit by hand.\n");
    out.push_str("pub static GAME_CONFIG: GameConfig = GameConfig {\n");

    out.push_str("    gameplay: GameplayConfig {\n");
    let _ = writeln!(
        out,
        "        initial_time_budget_ms: {},",
        gameplay.initial_time_budget_ms
    );
    let _ = writeln!(
        out,
        "        minimum_time_budget_ms: {},",
        gameplay.minimum_time_budget_ms
    );
    let _ = writeln!(
        out,
        "        time_decrement_ms: {},",
        gameplay.time_decrement_ms
    );
    let _ = writeln!(
        out,
        "        successes_per_ramp: {},",
        gameplay.successes_per_ramp
    );
    out.push_str("    },\n");

    out.push_str("    detector: DetectorConfig {\n");
    let _ = writeln!(
        out,
        "        motion_update_interval_ms: {},",
        detector.motion_update_interval_ms
    );
    let _ = writeln!(
        out,
        "        sample_window_ms: {},",
        detector.sample_window_ms
    );
    out.push_str("        shake: ShakeConfig {\n");
    let _ = writeln!(
        out,
        "            acceleration_threshold: {},",
        float_literal(detector.shake.acceleration_threshold)
    );
    let _ = writeln!(
        out,
        "            peak_separation_ms: {},",
        detector.shake.peak_separation_ms
    );
    let _ = writeln!(
        out,
        "            peaks_required: {},",
        detector.shake.peaks_required
    );
    out.push_str("        },\n");
    out.push_str("        flick_up: FlickUpConfig {\n");
    let _ = writeln!(
        out,
        "            acceleration_threshold: {},",
        float_literal(detector.flick_up.acceleration_threshold)
    );
    out.push_str("        },\n");
    out.push_str("        twist: TwistConfig {\n");
    let _ = writeln!(
        out,
        "            rotation_threshold: {},",
        float_literal(detector.twist.rotation_threshold)
    );
    out.push_str("        },\n");
    out.push_str("        spin_crown: SpinCrownConfig {\n");
    let _ = writeln!(
        out,
        "            delta_threshold: {},",
        float_literal(detector.spin_crown.delta_threshold)
    );
    out.push_str("        },\n");
    out.push_str("    },\n");

    out.push_str("    timing: TimingConfig {\n");
    let _ = writeln!(out, "        tick_interval_ms: {},", timing.tick_interval_ms);
    let _ = writeln!(out, "        speed_up_pause_ms: {},", timing.speed_up_pause_ms);
    out.push_str("    },\n");

    out.push_str("};\n");
    out
}

// `{:?}` always keeps a decimal point or exponent, so the literal stays a float.
fn float_literal(value: impl fmt::Debug) -> String {
    format!("{value:?}")
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let file = parse_game_file(path)?;
    validate_config(&file)?;
    Ok(render_generated_config(&file))
}
