//! Tests for layered option loading.
//!
//! Environment variables are process-global, so every test here runs inside a
//! figment `Jail` and serially.

use figment::Jail;
use serial_test::serial;
use std::path::PathBuf;

use fob_tracker::{TrackerError, TrackerOptions};

fn load(jail: &Jail) -> figment::error::Result<TrackerOptions> {
    TrackerOptions::load(jail.directory()).map_err(|e| e.to_string().into())
}

#[test]
#[serial]
fn test_defaults_without_sources() {
    Jail::expect_with(|jail| {
        let options = load(jail)?;
        assert_eq!(options, TrackerOptions::default());
        Ok(())
    });
}

#[test]
#[serial]
fn test_toml_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "fob-tracker.toml",
            r#"
                path = "assets/bundles"
                filename = "stats.json"
                logTime = true
            "#,
        )?;
        let options = load(jail)?;
        assert_eq!(options.path, Some(PathBuf::from("assets/bundles")));
        assert_eq!(options.filename, "stats.json");
        assert!(options.log_time);
        Ok(())
    });
}

#[test]
#[serial]
fn test_json_file() {
    Jail::expect_with(|jail| {
        jail.create_file("fob-tracker.json", r#"{"filename": "from-json.json"}"#)?;
        let options = load(jail)?;
        assert_eq!(options.filename, "from-json.json");
        assert!(!options.log_time);
        Ok(())
    });
}

#[test]
#[serial]
fn test_toml_wins_over_json() {
    Jail::expect_with(|jail| {
        jail.create_file("fob-tracker.toml", r#"filename = "toml.json""#)?;
        jail.create_file("fob-tracker.json", r#"{"filename": "json.json"}"#)?;
        assert_eq!(load(jail)?.filename, "toml.json");
        Ok(())
    });
}

#[test]
#[serial]
fn test_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "fob-tracker.toml",
            r#"
                filename = "file.json"
                logTime = false
            "#,
        )?;
        jail.set_env("FOB_TRACKER_FILENAME", "env.json");
        jail.set_env("FOB_TRACKER_LOGTIME", "true");
        jail.set_env("FOB_TRACKER_PATH", "/var/stats");

        let options = load(jail)?;
        assert_eq!(options.filename, "env.json");
        assert!(options.log_time);
        assert_eq!(options.path, Some(PathBuf::from("/var/stats")));
        Ok(())
    });
}

#[test]
#[serial]
fn test_env_timing_flag_beats_file_timing_flag() {
    Jail::expect_with(|jail| {
        jail.create_file("fob-tracker.json", r#"{"logTime": true}"#)?;
        jail.set_env("FOB_TRACKER_LOGTIME", "false");
        assert!(!load(jail)?.log_time);
        Ok(())
    });
}

#[test]
#[serial]
fn test_snake_case_env_key() {
    Jail::expect_with(|jail| {
        jail.set_env("FOB_TRACKER_LOG_TIME", "true");
        assert!(load(jail)?.log_time);
        Ok(())
    });
}

#[test]
#[serial]
fn test_invalid_value_is_config_error() {
    Jail::expect_with(|jail| {
        jail.create_file("fob-tracker.toml", r#"logTime = "sometimes""#)?;
        let err = TrackerOptions::load(jail.directory()).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
        Ok(())
    });
}

#[test]
#[serial]
fn test_empty_filename_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("fob-tracker.toml", r#"filename = "  ""#)?;
        let err = TrackerOptions::load(jail.directory()).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidOptions(_)));
        Ok(())
    });
}
