use std::{fs, path::PathBuf};

use door_config_compiler::{
    generate_from_path, parse_config_file, parse_config_str, render_generated_config,
    validate_config, ConfigCompilerError,
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

fn snapshot(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join(name)
}

#[test]
fn default_config_matches_snapshot() {
    let config = repo_root().join("config/door.toml");
    let actual = generate_from_path(&config).expect("default config should compile");
    let expected = fs::read_to_string(snapshot("default_generated.rs"))
        .expect("missing default snapshot file");

    assert_eq!(
        actual, expected,
        "generated output changed; if intentional, update tools/door_config_compiler/tests/snapshots/default_generated.rs"
    );
}

#[test]
fn generation_is_deterministic_for_same_input() {
    let config = fixture("valid_default.toml");
    let first = generate_from_path(&config).expect("first generation failed");
    let second = generate_from_path(&config).expect("second generation failed");
    assert_eq!(first, second);
}

#[test]
fn tilted_mount_renders_its_references() {
    let path = fixture("valid_tight.toml");
    let config = parse_config_file(&path).expect("fixture should parse");
    validate_config(&config).expect("fixture should validate");
    let rendered = render_generated_config(&config);

    for needle in [
        "accel_threshold: 0.25,",
        "stop_timeout_ms: 1500,",
        "max_close_ms: 20000,",
        "stall_threshold: 0.05,",
        "closed_position: AxisPosition { y: 6.9, z: 6.9 },",
        "open_position: AxisPosition { y: -6.9, z: 6.9 },",
        "position_tolerance: 0.75,",
    ] {
        assert!(
            rendered.contains(needle),
            "rendered output missing `{needle}`"
        );
    }
}

#[test]
fn semantic_validation_rejects_unusable_tunables() {
    let cases = [
        (
            "invalid/negative_threshold.toml",
            "motion.accel_threshold must be a finite non-negative number",
        ),
        (
            "invalid/zero_stop_timeout.toml",
            "motion.stop_timeout_ms must be > 0",
        ),
        (
            "invalid/stall_above_accel.toml",
            "stall.threshold must be <= motion.accel_threshold",
        ),
        (
            "invalid/overlapping_positions.toml",
            "positions.closed and positions.open overlap",
        ),
        (
            "invalid/zero_tolerance.toml",
            "positions.tolerance must be > 0",
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
    let cases = [
        ("invalid/missing_stall.toml", "stall"),
        ("invalid/unknown_field.toml", "debounce_ms"),
    ];

    for (fixture_name, needle) in cases {
        let err = generate_from_path(&fixture(fixture_name)).expect_err("fixture should fail parsing");
        match err {
            ConfigCompilerError::Parse(msg) => {
                assert!(
                    msg.contains(needle),
                    "expected parse error mentioning {needle}, got `{msg}`"
                );
            }
            other => panic!("expected parse error, got {other}"),
        }
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = generate_from_path(&fixture("does_not_exist.toml"))
        .expect_err("missing file should fail");
    assert!(matches!(err, ConfigCompilerError::Io(_)), "got {err}");
}

#[test]
fn non_finite_reference_is_rejected() {
    let raw = fs::read_to_string(fixture("valid_default.toml")).expect("fixture should exist");
    let raw = raw.replace("closed = { y = 9.8, z = 0.0 }", "closed = { y = nan, z = 0.0 }");
    let config = parse_config_str(&raw).expect("nan is valid toml");
    let err = validate_config(&config).expect_err("nan reference should fail");
    assert!(
        err.to_string()
            .contains("positions.closed coordinates must be finite"),
        "got {err}"
    );
}
