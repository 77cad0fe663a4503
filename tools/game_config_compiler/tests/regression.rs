use std::path::PathBuf;

use game_config_compiler::{
    generate_from_path, parse_game_file, render_generated_config, validate_config,
    ConfigCompilerError,
};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("missing tools dir")
        .parent()
        .expect("missing repo root")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn shipped_config_compiles() {
    let config = repo_root().join("config/game.toml");
    let generated = generate_from_path(&config).expect("shipped config should compile");
    assert!(generated.starts_with("// @generated"));
    assert!(generated.contains("pub static GAME_CONFIG: GameConfig = GameConfig {"));
}

#[test]
fn generation_is_deterministic_for_same_input() {
    let config = fixture("valid_default.toml");
    let first = generate_from_path(&config).expect("first generation failed");
    let second = generate_from_path(&config).expect("second generation failed");
    assert_eq!(first, second);
}

#[test]
fn default_values_render_as_rust_literals() {
    let generated = generate_from_path(&fixture("valid_default.toml")).expect("compile");
    for needle in [
        "initial_time_budget_ms: 3000,",
        "minimum_time_budget_ms: 500,",
        "time_decrement_ms: 100,",
        "successes_per_ramp: 3,",
        "motion_update_interval_ms: 20,",
        "sample_window_ms: 600,",
        "acceleration_threshold: 2.2,",
        "peak_separation_ms: 120,",
        "peaks_required: 2,",
        "acceleration_threshold: 1.6,",
        "rotation_threshold: 5.0,",
        "delta_threshold: 0.35,",
        "tick_interval_ms: 50,",
        "speed_up_pause_ms: 2000,",
    ] {
        assert!(
            generated.contains(needle),
            "generated output missing `{needle}`"
        );
    }
}

#[test]
fn tuned_values_flow_through() {
    let path = fixture("valid_tuned.toml");
    let file = parse_game_file(&path).expect("fixture should parse");
    validate_config(&file).expect("fixture should validate");
    let rendered = render_generated_config(&file);
    assert!(rendered.contains("speed_up_pause_ms: 1500,"));
    assert!(rendered.contains("delta_threshold: 0.5,"));
}

#[test]
fn semantic_validation_rejects_invalid_ranges() {
    let cases = [
        (
            "invalid/min_above_initial.toml",
            "gameplay.minimum_time_budget_ms must be <= gameplay.initial_time_budget_ms",
        ),
        (
            "invalid/zero_decrement.toml",
            "gameplay.time_decrement_ms must be > 0",
        ),
        (
            "invalid/zero_ramp.toml",
            "gameplay.successes_per_ramp must be >= 1",
        ),
        (
            "invalid/negative_threshold.toml",
            "all detector thresholds must be finite and positive",
        ),
        (
            "invalid/separation_exceeds_window.toml",
            "detector.shake.peak_separation_ms must be < detector.sample_window_ms",
        ),
    ];

    for (fixture_name, expected_msg) in cases {
        let path = fixture(fixture_name);
        let err = generate_from_path(&path).expect_err("fixture should fail validation");
        match err {
            ConfigCompilerError::Validation(msg) => {
                assert!(
                    msg.contains(expected_msg),
                    "expected validation message containing `{expected_msg}`, got `{msg}`"
                );
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}

#[test]
fn parse_errors_are_reported_for_schema_mismatches() {
    let missing = generate_from_path(&fixture("invalid/missing_timing.toml"))
        .expect_err("fixture should fail parsing");
    match missing {
        ConfigCompilerError::Parse(msg) => {
            assert!(
                msg.contains("timing"),
                "expected parse error mentioning timing, got `{msg}`"
            );
        }
        other => panic!("expected parse error, got {other}"),
    }

    let unknown = generate_from_path(&fixture("invalid/unknown_field.toml"))
        .expect_err("fixture should fail parsing");
    match unknown {
        ConfigCompilerError::Parse(msg) => {
            assert!(
                msg.contains("tick_rate_hz"),
                "expected parse error mentioning tick_rate_hz, got `{msg}`"
            );
        }
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = generate_from_path(&fixture("does_not_exist.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigCompilerError::Io(_)));
}
