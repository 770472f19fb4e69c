use serial_test::serial;
use std::path::Path;
use std::process::Command;

const FAST_SETTINGS: &str = "clock_interval_seconds = 0.01\n\
warmup_seconds = 0.1\n\
state_poll_seconds = 0.05\n\
shutdown_grace_seconds = 0.05\n";

fn write_fast_config(dir: &Path) -> String {
    let path = dir.join("settings.toml");
    std::fs::write(&path, FAST_SETTINGS).expect("write settings");
    path.to_string_lossy().to_string()
}

#[test]
fn config_prints_default_settings() {
    let exe = env!("CARGO_BIN_EXE_liveplot");
    let output = Command::new(exe)
        .arg("config")
        .output()
        .expect("run config");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("clock_interval_seconds = 0.1"));
    assert!(stdout.contains("data_capacity = 50"));
}

#[test]
fn config_writes_settings_file() {
    let exe = env!("CARGO_BIN_EXE_liveplot");
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let path = temp_dir.path().join("agent.toml");
    let status = Command::new(exe)
        .args(["config", "--output", path.to_string_lossy().as_ref()])
        .status()
        .expect("run config");
    assert!(status.success());
    let written = std::fs::read_to_string(&path).expect("read settings");
    assert!(written.contains("warmup_seconds"));
}

#[test]
#[serial]
fn demo_reports_rendered_windows_as_json() {
    let exe = env!("CARGO_BIN_EXE_liveplot");
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let config = write_fast_config(temp_dir.path());
    let output = Command::new(exe)
        .args([
            "demo",
            "--windows",
            "2",
            "--kind",
            "multi",
            "--duration-seconds",
            "0.6",
            "--refresh-seconds",
            "0.02",
            "--config",
            &config,
            "--json",
        ])
        .output()
        .expect("run demo");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json summary");
    let windows = summary["windows"].as_array().expect("windows");
    assert_eq!(windows.len(), 2);
    for window in windows {
        assert_eq!(window["kind"], "multi");
        assert!(window["rendered"].as_u64().unwrap_or(0) > 0);
        assert_eq!(window["last_values"].as_array().map(|v| v.len()), Some(3));
        assert_eq!(window["legend"][0], "Channel sine 1");
        assert_eq!(window["legend"].as_array().map(|v| v.len()), Some(3));
    }
    assert_eq!(summary["open_windows"], 2);
}

#[test]
#[serial]
fn demo_recycles_the_closed_window_key() {
    let exe = env!("CARGO_BIN_EXE_liveplot");
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let config = write_fast_config(temp_dir.path());
    let output = Command::new(exe)
        .args([
            "demo",
            "--windows",
            "3",
            "--duration-seconds",
            "1.5",
            "--close-after-seconds",
            "0.3",
            "--config",
            &config,
            "--json",
        ])
        .output()
        .expect("run demo");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json summary");
    assert_eq!(summary["recycled_key"], "0");
    assert_eq!(summary["closed_callbacks"], 1);
    let first = summary["windows"]
        .as_array()
        .and_then(|windows| windows.iter().find(|w| w["key"] == "0"))
        .expect("window 0");
    assert_eq!(first["incarnations"], 2);
    assert_eq!(first["open"], true);
}

#[test]
fn demo_with_missing_config_fails() {
    let exe = env!("CARGO_BIN_EXE_liveplot");
    let output = Command::new(exe)
        .args(["demo", "--config", "/nonexistent/liveplot.toml"])
        .output()
        .expect("run demo");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[LivePlot][ERROR]"));
}
