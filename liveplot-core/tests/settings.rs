use liveplot_core::{load_settings_file, save_settings_file, AgentSettings, SettingsError};
use tempfile::tempdir;

#[test]
fn defaults_match_documented_values() {
    let settings = AgentSettings::default();
    assert_eq!(settings.clock_interval_seconds, 0.1);
    assert_eq!(settings.data_capacity, 50);
    assert!(!settings.verbose);
    assert_eq!(settings.state_poll_seconds, 2.0);
}

#[test]
fn normalized_repairs_bad_values() {
    let settings = AgentSettings {
        clock_interval_seconds: 0.0,
        data_capacity: 0,
        warmup_seconds: -1.0,
        state_poll_seconds: f64::NAN,
        ..AgentSettings::default()
    }
    .normalized();
    assert_eq!(settings.clock_interval_seconds, 0.1);
    assert_eq!(settings.data_capacity, 1);
    assert_eq!(settings.warmup_seconds, 5.0);
    assert_eq!(settings.state_poll_seconds, 2.0);
}

#[test]
fn toml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("liveplot.toml");
    let settings = AgentSettings::default().with_clock(0.02).with_verbose(true);
    save_settings_file(&path, &settings).unwrap();
    assert_eq!(load_settings_file(&path).unwrap(), settings);
}

#[test]
fn json_partial_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("liveplot.json");
    std::fs::write(&path, r#"{ "data_capacity": 8 }"#).unwrap();
    let settings = load_settings_file(&path).unwrap();
    assert_eq!(settings.data_capacity, 8);
    assert_eq!(settings.clock_interval_seconds, 0.1);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = load_settings_file(&dir.path().join("nope.toml")).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn save_reports_unusable_parent_directory() {
    let dir = tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").expect("write blocker");
    let path = blocker.join("nested").join("agent.toml");

    match save_settings_file(&path, &AgentSettings::default()) {
        Err(SettingsError::Write { path: failed, .. }) => {
            assert!(failed.ends_with("nested"), "unexpected path {failed}");
        }
        other => panic!("expected a write error, got {other:?}"),
    }
}
