//! Integration tests for Settings loading from explicit config files.
//!
//! These tests read files only (`load_file_only`), so neither a global config
//! on the machine nor SEGVIZ_* variables can leak into them.

use std::fs;

use tempfile::TempDir;

use segviz::application::{ApplicationError, Operation, Session};
use segviz::config::Settings;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("segviz.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_config_with_data_and_script_when_loading_then_session_uses_both() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
data = [5, 5, 5, 5]

[[script]]
op = "update_range"
l = 0
r = 1
delta = 1

[[script]]
label = "Left half"
op = "query"
l = 0
r = 1
"#,
    );

    // Act
    let settings = Settings::load_file_only(&path).expect("load settings");
    let mut session = Session::new(&settings.data, settings.script().unwrap()).unwrap();
    let reports = session.run_all().unwrap();

    // Assert
    assert_eq!(settings.script.len(), 2);
    assert_eq!(reports[1].label, "Left half");
    assert_eq!(reports[1].result, Some(12));
}

#[test]
fn given_layout_overrides_when_loading_then_other_fields_keep_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[layout]
width = 640.0
"#,
    );

    let settings = Settings::load_file_only(&path).unwrap();
    assert_eq!(settings.layout.width, 640.0);
    assert_eq!(settings.layout.root_x, 600.0);
    assert_eq!(settings.data, vec![2, 1, 3, 4, 5, 7, 8, 9]);
}

#[test]
fn given_malformed_config_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "data = [1, 2,");

    let err = Settings::load_file_only(&path).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_missing_explicit_config_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_settings_when_serialized_then_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.strict_bounds = true;
    settings.script = vec![segviz::application::Step::new(Operation::Query { l: 1, r: 2 })];

    let path = write_config(&dir, &settings.to_toml().unwrap());
    let reloaded = Settings::load_file_only(&path).unwrap();
    assert_eq!(reloaded, settings);
}
