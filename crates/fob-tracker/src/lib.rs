#![cfg_attr(docsrs, feature(doc_cfg))]

//! # fob-tracker
//!
//! Build-status tracking for fob. A [`StatusTracker`] observes a bundler's
//! lifecycle events and keeps a JSON stats file up to date with the run's
//! status (`compiling`, `error` or `done`) and the files emitted per chunk.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fob_tracker::{ChunkInfo, HostOutput, RunStats, StatusTracker, TrackerOptions};
//!
//! # fn main() -> fob_tracker::Result<()> {
//! let host = HostOutput::new().with_public_path("/static/").with_path("/srv/dist");
//! let mut tracker = StatusTracker::new(TrackerOptions::new().with_path("build"));
//!
//! tracker.on_compile_start(&host)?;
//! let stats = RunStats::new().with_chunk(ChunkInfo::new("main", ["main.js"]));
//! tracker.on_run_finished(&host, &stats)?;
//! // build/webpack-stats.json now holds
//! // {"status":"done","chunks":{"main":[{"name":"main.js","publicPath":"/static/main.js","path":"/srv/dist/main.js"}]},"publicPath":"/static/"}
//! # Ok(()) }
//! ```
//!
//! Bundler integrations call the three `on_*` handlers from their own hooks;
//! see `fob-plugin-tracker` for the Rolldown adapter.

pub mod config;
pub mod error;
pub mod host;
pub mod sink;
pub mod snapshot;
pub mod tracker;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

pub use config::{DEFAULT_FILENAME, TrackerOptions};
pub use error::{Result, TrackerError};
pub use host::{BuildHost, ChunkInfo, HostOutput, ModuleFailure, RunError, RunStats};
pub use sink::{FsSink, MemorySink, SnapshotSink, write_atomic};
pub use snapshot::{ChunkMap, EmittedFile, ErrorReport, Phase, Snapshot, Status};
pub use tracker::{StatusTracker, emitted_file};

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};
