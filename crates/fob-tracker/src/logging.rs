//! Logging setup for binaries embedding the tracker
//!
//! Only available with the `logging` feature. The tracker itself only emits
//! `tracing` events: `warn` for failures, `info` when a run finishes and
//! `debug` for every snapshot write.

use std::sync::Once;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

static INIT: Once = Once::new();

/// Verbosity of tracker output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    fn as_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Silent => LevelFilter::OFF,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown tracker log level '{other}'")),
        }
    }
}

/// Install a global subscriber at `level`; `RUST_LOG` directives still apply.
///
/// Only the first call in a process takes effect.
pub fn init_logging(level: LogLevel) {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(level.as_level_filter().into())
            .from_env_lossy();
        // Another subscriber may already be installed by the host application
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .try_init();
    });
}

/// Same as [`init_logging`] at `info`, leaving the level to `RUST_LOG`.
pub fn init_logging_from_env() {
    init_logging(LogLevel::Info);
}
