//! Rolldown plugin that reports build status to a stats file
//!
//! This plugin attaches a [`StatusTracker`] to Rolldown's build lifecycle so
//! that tools outside the bundler (dev servers, template helpers) can poll a
//! single JSON document for the current build status and the files emitted
//! per chunk.
//!
//! ## Hook mapping
//!
//! ```text
//! build_start     → compile start    {"status":"compiling"}
//! build_end(errs) → module failed ×N {"status":"error","file":...}
//!                 → run finished     {"status":"error","chunks":...}
//! generate_bundle → run finished     {"status":"done","chunks":...}
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_tracker::FobTrackerPlugin;
//! use fob_tracker::{HostOutput, TrackerOptions};
//! use std::sync::Arc;
//!
//! let host = HostOutput::new().with_public_path("/static/").with_path("dist");
//! let plugin = Arc::new(FobTrackerPlugin::new(TrackerOptions::default(), host));
//! // Register `plugin` with your Rolldown bundler options
//! ```

use anyhow::Context;
use fob_tracker::{ChunkInfo, FsSink, HostOutput, RunStats, SnapshotSink, StatusTracker, TrackerOptions};
use parking_lot::Mutex;
use rolldown_common::Output;
use rolldown_plugin::{
    HookBuildEndArgs, HookBuildStartArgs, HookGenerateBundleArgs, HookNoopReturn, HookUsage,
    Plugin, PluginContext,
};
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

mod diagnostic;
pub use diagnostic::{DiagnosticSource, ExtractedFailure, FALLBACK_KIND};

/// Rolldown plugin that keeps a build-status stats file current
///
/// Each plugin instance owns its own tracker; clones share it.
#[derive(Debug, Clone)]
pub struct FobTrackerPlugin<S = FsSink> {
    host: HostOutput,
    state: Arc<Mutex<TrackerState<S>>>,
}

#[derive(Debug)]
struct TrackerState<S> {
    tracker: StatusTracker<S>,
    /// Wall-clock start of the current run, Unix epoch milliseconds
    started_at: i64,
}

impl FobTrackerPlugin<FsSink> {
    pub fn new(options: TrackerOptions, host: HostOutput) -> Self {
        Self::with_sink(options, host, FsSink)
    }
}

impl<S: SnapshotSink> FobTrackerPlugin<S> {
    pub fn with_sink(options: TrackerOptions, host: HostOutput, sink: S) -> Self {
        Self {
            host,
            state: Arc::new(Mutex::new(TrackerState {
                tracker: StatusTracker::with_sink(options, sink),
                started_at: now_millis(),
            })),
        }
    }

    pub fn host(&self) -> &HostOutput {
        &self.host
    }

    /// Run `f` against the tracker, e.g. to inspect the current phase
    pub fn with_tracker<R>(&self, f: impl FnOnce(&StatusTracker<S>) -> R) -> R {
        f(&self.state.lock().tracker)
    }

    /// A build started
    pub fn compile_started(&self) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        state.started_at = now_millis();
        state
            .tracker
            .on_compile_start(&self.host)
            .context("Failed to write compiling status")?;
        Ok(())
    }

    /// A build ended with errors. Each error is first reported as a module
    /// failure, then the run is closed with the error list.
    pub fn build_failed(&self, failures: &[ExtractedFailure]) -> anyhow::Result<()> {
        if failures.is_empty() {
            return Ok(());
        }

        let mut state = self.state.lock();
        for failure in failures {
            state
                .tracker
                .on_module_failed(&self.host, &failure.to_module_failure())
                .context("Failed to write module error status")?;
        }

        let stats = RunStats {
            errors: failures.iter().map(ExtractedFailure::to_run_error).collect(),
            chunks: Vec::new(),
            start_time: state.started_at,
            end_time: now_millis(),
        };
        state
            .tracker
            .on_run_finished(&self.host, &stats)
            .context("Failed to write build error status")?;
        Ok(())
    }

    /// A bundle was generated
    pub fn bundle_generated(&self, outputs: &[Output]) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        let stats = RunStats {
            errors: Vec::new(),
            chunks: collect_chunks(outputs),
            start_time: state.started_at,
            end_time: now_millis(),
        };
        state
            .tracker
            .on_run_finished(&self.host, &stats)
            .context("Failed to write done status")?;
        Ok(())
    }
}

/// Chunk name → emitted files (chunk file, then its source map if any)
pub fn collect_chunks(outputs: &[Output]) -> Vec<ChunkInfo> {
    outputs
        .iter()
        .filter_map(|output| match output {
            Output::Chunk(chunk) => {
                let mut files = vec![chunk.filename.to_string()];
                files.extend(chunk.sourcemap_filename.clone());
                Some(ChunkInfo {
                    name: chunk.name.to_string(),
                    files,
                })
            }
            Output::Asset(_) => None,
        })
        .collect()
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl<S> Plugin for FobTrackerPlugin<S>
where
    S: SnapshotSink + Debug + 'static,
{
    fn name(&self) -> Cow<'static, str> {
        "fob-tracker".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::BuildStart | HookUsage::BuildEnd | HookUsage::GenerateBundle
    }

    fn build_start(
        &self,
        _ctx: &PluginContext,
        _args: &HookBuildStartArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let result = self.compile_started();

        async move {
            result?;
            Ok(())
        }
    }

    /// Only reports when the build recorded errors; successful builds are
    /// reported from `generate_bundle`, once chunk file names are known.
    fn build_end(
        &self,
        _ctx: &PluginContext,
        args: Option<&HookBuildEndArgs<'_>>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let failures: Vec<ExtractedFailure> = args
            .map(|args| {
                args.errors
                    .iter()
                    .map(ExtractedFailure::from_diagnostic)
                    .collect()
            })
            .unwrap_or_default();
        if !failures.is_empty() {
            tracing::debug!("[fob-tracker] build ended with {} error(s)", failures.len());
        }
        let result = self.build_failed(&failures);

        async move {
            result?;
            Ok(())
        }
    }

    fn generate_bundle(
        &self,
        _ctx: &PluginContext,
        args: &mut HookGenerateBundleArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let result = self.bundle_generated(args.bundle.as_slice());

        async move {
            result?;
            Ok(())
        }
    }
}
