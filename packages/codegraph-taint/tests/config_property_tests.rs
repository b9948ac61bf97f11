//! Property-based tests for propagation configuration
//!
//! Uses QuickCheck and PropTest to check validation and YAML loading over
//! generated inputs.

use codegraph_taint::{ConfigError, Preset, PropagationConfig, Validatable};
use proptest::prelude::*;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

// ============================================================================
// QuickCheck: Validation Properties
// ============================================================================

#[quickcheck]
fn qc_distance_validation_matches_range(distance: u32) -> TestResult {
    let config = PropagationConfig::default().maximum_source_sink_distance(distance);
    let in_range = (1..=100).contains(&distance);
    TestResult::from_bool(config.validate().is_ok() == in_range)
}

#[quickcheck]
fn qc_out_of_range_distance_names_field(distance: u32) -> TestResult {
    if (1..=100).contains(&distance) {
        return TestResult::discard();
    }
    let config = PropagationConfig::default().maximum_source_sink_distance(distance);
    match config.validate() {
        Err(ConfigError::Range { field, .. }) => {
            TestResult::from_bool(field == "maximum_source_sink_distance")
        }
        _ => TestResult::failed(),
    }
}

#[quickcheck]
fn qc_unsupported_version_rejected(version: u32) -> TestResult {
    if version == 1 {
        return TestResult::discard();
    }
    let yaml = format!("version: {}\n", version);
    TestResult::from_bool(matches!(
        PropagationConfig::from_yaml_str(&yaml),
        Err(ConfigError::UnsupportedVersion { found, .. }) if found == version
    ))
}

// ============================================================================
// PropTest: YAML Properties
// ============================================================================

fn preset_strategy() -> impl Strategy<Value = Preset> {
    prop_oneof![
        Just(Preset::Fast),
        Just(Preset::Balanced),
        Just(Preset::Thorough),
    ]
}

proptest! {
    #[test]
    fn prop_yaml_roundtrip(distance in 1u32..=100, collect in any::<bool>()) {
        let config = PropagationConfig::default()
            .maximum_source_sink_distance(distance)
            .collect_diagnostics(collect);
        let yaml = config.to_yaml().unwrap();
        let loaded = PropagationConfig::from_yaml_str(&yaml).unwrap();
        prop_assert_eq!(loaded, config);
    }

    #[test]
    fn prop_preset_yaml_uses_preset_distance(preset in preset_strategy()) {
        let yaml = format!("version: 1\npreset: {}\n", preset);
        let loaded = PropagationConfig::from_yaml_str(&yaml).unwrap();
        prop_assert_eq!(
            loaded.maximum_source_sink_distance,
            preset.maximum_source_sink_distance()
        );
    }

    #[test]
    fn prop_override_beats_preset(preset in preset_strategy(), distance in 1u32..=100) {
        let yaml = format!(
            "version: 1\npreset: {}\nmaximum_source_sink_distance: {}\n",
            preset, distance
        );
        let loaded = PropagationConfig::from_yaml_str(&yaml).unwrap();
        prop_assert_eq!(loaded.maximum_source_sink_distance, distance);
    }

    #[test]
    fn prop_preset_name_roundtrip(preset in preset_strategy()) {
        prop_assert_eq!(preset.as_str().parse::<Preset>().unwrap(), preset);
        prop_assert_eq!(preset.to_string().to_uppercase().parse::<Preset>().unwrap(), preset);
    }
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_missing_version_rejected() {
    assert!(matches!(
        PropagationConfig::from_yaml_str("maximum_source_sink_distance: 4\n"),
        Err(ConfigError::MissingVersion)
    ));
}

#[test]
fn test_unknown_field_rejected() {
    assert!(matches!(
        PropagationConfig::from_yaml_str("version: 1\nmax_depth: 4\n"),
        Err(ConfigError::Yaml(_))
    ));
}

#[test]
fn test_zero_distance_rejected_from_yaml() {
    assert!(matches!(
        PropagationConfig::from_yaml_str("version: 1\nmaximum_source_sink_distance: 0\n"),
        Err(ConfigError::Range { .. })
    ));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!(
        "codegraph-taint-config-{}.yaml",
        std::process::id()
    ));
    std::fs::write(&path, "version: 1\npreset: fast\ncollect_diagnostics: false\n").unwrap();
    let loaded = PropagationConfig::from_yaml(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.maximum_source_sink_distance, 3);
    assert!(!loaded.collect_diagnostics);
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(
        PropagationConfig::from_yaml("/nonexistent/codegraph-taint.yaml"),
        Err(ConfigError::Io(_))
    ));
}
