//! Status tracker state machine
//!
//! The tracker turns host lifecycle events into snapshots:
//!
//! ```text
//! compile start ──► {"status":"compiling"}          (chunk map cleared)
//! module failed ──► {"status":"error", file, ...}    (zero or more per run)
//! run finished  ──► {"status":"error", chunks, ...}  if the run recorded errors
//!               └─► {"status":"done", chunks, ...}   otherwise
//! ```
//!
//! Every handler writes exactly one snapshot through the sink and returns it.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::{debug, info, warn};

use crate::config::TrackerOptions;
use crate::error::Result;
use crate::host::{BuildHost, ChunkInfo, ModuleFailure, RunStats};
use crate::sink::{FsSink, SnapshotSink};
use crate::snapshot::{ChunkMap, EmittedFile, Phase, Snapshot};

/// State of the run currently being observed
#[derive(Debug, Clone, Default)]
struct Run {
    phase: Option<Phase>,
    start_time: Option<i64>,
    end_time: Option<i64>,
    chunks: ChunkMap,
}

/// Observes one host's build runs and writes a status snapshot per event.
///
/// Each tracker owns its chunk map; trackers attached to different hosts
/// never share state.
#[derive(Debug)]
pub struct StatusTracker<S = FsSink> {
    options: TrackerOptions,
    sink: S,
    run: Run,
}

impl StatusTracker<FsSink> {
    /// Create a tracker that writes to the filesystem
    pub fn new(options: TrackerOptions) -> Self {
        Self::with_sink(options, FsSink)
    }
}

impl<S: SnapshotSink> StatusTracker<S> {
    pub fn with_sink(options: TrackerOptions, sink: S) -> Self {
        Self {
            options,
            sink,
            run: Run::default(),
        }
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Where snapshots are written
    pub fn output_file(&self) -> PathBuf {
        self.options.output_file()
    }

    /// Phase of the last snapshot written, `None` before the first event
    pub fn phase(&self) -> Option<Phase> {
        self.run.phase
    }

    /// Chunks accumulated for the current run
    pub fn chunks(&self) -> &ChunkMap {
        &self.run.chunks
    }

    /// Start and end time of the last completed run, when timing is enabled
    pub fn timing(&self) -> Option<(i64, i64)> {
        self.run.start_time.zip(self.run.end_time)
    }

    /// A module failed to build. Reported immediately; the run carries on.
    pub fn on_module_failed(
        &mut self,
        host: impl BuildHost,
        failure: &ModuleFailure,
    ) -> Result<Snapshot> {
        let message = failure
            .formatted_message
            .as_deref()
            .map(|m| console::strip_ansi_codes(m).into_owned());

        warn!(
            kind = %failure.kind,
            module = failure.module.as_deref().unwrap_or("<unknown>"),
            "module failed"
        );

        let snapshot = Snapshot::module_error(&failure.kind, failure.module.clone(), message)
            .with_public_path(host.public_path());
        self.emit(Phase::Error, snapshot)
    }

    /// A new run started. Drops everything accumulated by the previous run.
    pub fn on_compile_start(&mut self, host: impl BuildHost) -> Result<Snapshot> {
        self.run = Run::default();
        debug!("compile started");

        let snapshot = Snapshot::compiling().with_public_path(host.public_path());
        self.emit(Phase::Compiling, snapshot)
    }

    /// The run finished, successfully or not.
    ///
    /// Only the first run-level error is reported; the chunk map goes out
    /// as accumulated so far and chunk files are not enumerated.
    pub fn on_run_finished(&mut self, host: impl BuildHost, stats: &RunStats) -> Result<Snapshot> {
        if let Some(first) = stats.errors.first() {
            warn!(
                kind = %first.kind,
                dropped = stats.errors.len() - 1,
                "run finished with errors"
            );
            let snapshot = Snapshot::run_error(&first.kind, &first.message, self.run.chunks.clone())
                .with_public_path(host.public_path());
            return self.emit(Phase::Error, snapshot);
        }

        for chunk in &stats.chunks {
            self.record_chunk(&host, chunk);
        }

        let timing = if self.options.log_time {
            self.run.start_time = Some(stats.start_time);
            self.run.end_time = Some(stats.end_time);
            Some((stats.start_time, stats.end_time))
        } else {
            None
        };

        info!(chunks = self.run.chunks.len(), "run finished");

        let snapshot = Snapshot::done(self.run.chunks.clone(), timing)
            .with_public_path(host.public_path());
        self.emit(Phase::Done, snapshot)
    }

    fn record_chunk(&mut self, host: &impl BuildHost, chunk: &ChunkInfo) {
        let files = self.run.chunks.entry(chunk.name.clone()).or_default();
        files.extend(chunk.files.iter().map(|file| emitted_file(host, file)));
    }

    fn emit(&mut self, phase: Phase, snapshot: Snapshot) -> Result<Snapshot> {
        let path = self.options.output_file();
        self.sink.write_snapshot(&path, &snapshot)?;
        self.run.phase = Some(phase);
        debug!(%phase, path = %path.display(), "wrote status snapshot");
        Ok(snapshot)
    }
}

/// Describe one emitted file, decorated from the host's output configuration.
pub fn emitted_file(host: &impl BuildHost, file: &str) -> EmittedFile {
    let mut emitted = EmittedFile::new(file);
    if let Some(public_path) = host.public_path() {
        emitted.public_path = Some(format!("{public_path}{file}"));
    }
    if let Some(dir) = host.output_path() {
        emitted.path = Some(join_output_path(dir, file));
    }
    emitted
}

// File names are always relative to the output directory, even when they
// carry a leading separator.
fn join_output_path(dir: &Path, file: &str) -> String {
    let relative = file.trim_start_matches(['/', '\\']);
    dir.join(relative).clean().to_string_lossy().into_owned()
}
