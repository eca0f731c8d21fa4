//! Error types for the status tracker and its snapshot sink

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while recording or persisting a status snapshot
#[derive(Error, Debug, Diagnostic)]
pub enum TrackerError {
    /// The parent directory of the stats file could not be created
    #[error("Failed to create directory '{}': {source}", .path.display())]
    #[diagnostic(
        code(fob::tracker::create_dir_failed),
        help("Check that the tracker `path` option points to a writable location")
    )]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stats file could not be written or moved into place
    #[error("Failed to write stats file '{}': {source}", .path.display())]
    #[diagnostic(
        code(fob::tracker::write_failed),
        help("Check disk space and permissions for the stats file")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be serialized to JSON
    #[error("Failed to serialize status snapshot: {0}")]
    #[diagnostic(code(fob::tracker::serialize_failed))]
    Serialize(#[from] serde_json::Error),

    /// Layered configuration could not be extracted
    #[error("Invalid tracker configuration: {0}")]
    #[diagnostic(
        code(fob::tracker::config),
        help("Check fob-tracker.toml / fob-tracker.json syntax and FOB_TRACKER_* variables")
    )]
    Config(String),

    /// Options were well-formed but unusable
    #[error("Invalid tracker options: {0}")]
    #[diagnostic(code(fob::tracker::invalid_options))]
    InvalidOptions(String),
}

impl TrackerError {
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<figment::Error> for TrackerError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
