//! Tracker options
//!
//! Options control where the stats file goes and whether run timing is
//! recorded. They can be built in code or loaded from layered sources:
//!
//! 1. Defaults
//! 2. `fob-tracker.toml` or `fob-tracker.json` in the project root
//! 3. `FOB_TRACKER_*` environment variables

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Stats file name used when none is configured
pub const DEFAULT_FILENAME: &str = "webpack-stats.json";

/// Config file names searched by [`TrackerOptions::load`], in order
pub const CONFIG_FILES: [&str; 2] = ["fob-tracker.toml", "fob-tracker.json"];

const ENV_PREFIX: &str = "FOB_TRACKER_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerOptions {
    /// Directory the stats file is written to (defaults to the current directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Stats file name
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Include `startTime`/`endTime` in `done` snapshots
    #[serde(default)]
    pub log_time: bool,
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            path: None,
            filename: default_filename(),
            log_time: false,
        }
    }
}

impl TrackerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_log_time(mut self, enabled: bool) -> Self {
        self.log_time = enabled;
        self
    }

    /// Full path of the stats file
    pub fn output_file(&self) -> PathBuf {
        let dir = self.path.as_deref().unwrap_or_else(|| Path::new("."));
        let filename = if self.filename.is_empty() {
            DEFAULT_FILENAME
        } else {
            self.filename.as_str()
        };
        dir.join(filename)
    }

    pub fn validate(&self) -> Result<()> {
        if self.filename.trim().is_empty() {
            return Err(TrackerError::InvalidOptions(
                "filename must not be empty".to_string(),
            ));
        }
        if Path::new(&self.filename).file_name().is_none() {
            return Err(TrackerError::InvalidOptions(format!(
                "filename '{}' does not name a file",
                self.filename
            )));
        }
        Ok(())
    }

    /// Load options from defaults, a config file in `root`, and the environment.
    /// Priority: environment > config file > defaults
    ///
    /// Defaults come from the serde field defaults, so a source only has to
    /// name the keys it changes.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(file) = find_config_file(root.as_ref()) {
            tracing::debug!("loading tracker options from {}", file.display());
            figment = if file.extension().is_some_and(|ext| ext == "json") {
                figment.merge(Json::file(file))
            } else {
                figment.merge(Toml::file(file))
            };
        }

        let options: Self = figment.merge(env_provider()).extract()?;
        options.validate()?;
        Ok(options)
    }
}

// Keys keep their case so each one can be mapped onto its serialized name;
// figment would otherwise lowercase `logTime` after mapping.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .lowercase(false)
        .map(|key| env_key(key.as_str()).into())
}

/// `FOB_TRACKER_LOG_TIME` → `logTime`; unknown keys pass through lowercased
fn env_key(key: &str) -> String {
    match key.to_ascii_lowercase().as_str() {
        "logtime" | "log_time" => "logTime".to_string(),
        other => other.to_string(),
    }
}

fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|candidate| candidate.is_file())
}
