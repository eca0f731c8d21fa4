//! Integration tests for the plugin writing a real stats file.

use std::fs;

use serde_json::{Value, json};
use tempfile::TempDir;

use fob_plugin_tracker::{ExtractedFailure, FobTrackerPlugin};
use fob_tracker::{HostOutput, Phase, TrackerOptions};

fn read(plugin: &FobTrackerPlugin) -> Value {
    let path = plugin.with_tracker(|tracker| tracker.output_file());
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_failed_build_leaves_error_document() {
    let temp = TempDir::new().unwrap();
    let options = TrackerOptions::new().with_path(temp.path());
    let plugin = FobTrackerPlugin::new(options, HostOutput::new());

    plugin.compile_started().unwrap();
    assert_eq!(read(&plugin), json!({"status": "compiling"}));

    let failure = ExtractedFailure::from_rendered("ParseError: \u{1b}[31mUnexpected token\u{1b}[0m in src/main.ts");
    plugin.build_failed(&[failure]).unwrap();

    let doc = read(&plugin);
    assert_eq!(doc["status"], json!("error"));
    assert_eq!(doc["error"], json!("ParseError"));
    assert_eq!(doc["chunks"], json!({}));
    assert_eq!(plugin.with_tracker(|t| t.phase()), Some(Phase::Error));
}

#[test]
fn test_generated_bundle_with_timing() {
    let temp = TempDir::new().unwrap();
    let options = TrackerOptions::new()
        .with_path(temp.path())
        .with_filename("stats.json")
        .with_log_time(true);
    let plugin = FobTrackerPlugin::new(options, HostOutput::new().with_public_path("/static/"));

    plugin.compile_started().unwrap();
    plugin.bundle_generated(&[]).unwrap();

    let doc = read(&plugin);
    assert_eq!(doc["status"], json!("done"));
    assert_eq!(doc["publicPath"], json!("/static/"));
    let start = doc["startTime"].as_i64().unwrap();
    let end = doc["endTime"].as_i64().unwrap();
    assert!(end >= start);
    assert!(temp.path().join("stats.json").is_file());
}
