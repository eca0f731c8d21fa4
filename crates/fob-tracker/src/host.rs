//! Host-side event payloads
//!
//! These types describe what a bundler hands to the tracker at each lifecycle
//! event. Adapters translate their bundler's native hook arguments into them.

use std::path::{Path, PathBuf};

/// Output configuration the tracker reads from its host at every event.
pub trait BuildHost {
    /// Public URL prefix for emitted files (e.g. `/static/`)
    fn public_path(&self) -> Option<&str>;

    /// Directory the bundler writes its output to
    fn output_path(&self) -> Option<&Path>;
}

/// Plain host configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostOutput {
    pub public_path: Option<String>,
    pub path: Option<PathBuf>,
}

impl HostOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = Some(public_path.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl BuildHost for HostOutput {
    fn public_path(&self) -> Option<&str> {
        self.public_path.as_deref().filter(|p| !p.is_empty())
    }

    fn output_path(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl<T: BuildHost + ?Sized> BuildHost for &T {
    fn public_path(&self) -> Option<&str> {
        (**self).public_path()
    }

    fn output_path(&self) -> Option<&Path> {
        (**self).output_path()
    }
}

/// A single module that failed to build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    /// Error kind name, e.g. `ModuleBuildError`
    pub kind: String,
    /// Request path of the failing module, when the host could resolve it
    pub module: Option<String>,
    /// Formatted diagnostic (code frame); may contain ANSI escapes
    pub formatted_message: Option<String>,
}

impl ModuleFailure {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            module: None,
            formatted_message: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_formatted_message(mut self, message: impl Into<String>) -> Self {
        self.formatted_message = Some(message.into());
        self
    }
}

/// An error recorded against the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    pub kind: String,
    pub message: String,
}

impl RunError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// A chunk produced by the run and the files it emitted, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub name: String,
    pub files: Vec<String>,
}

impl ChunkInfo {
    pub fn new<I, S>(name: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything the host reports when a run finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub errors: Vec<RunError>,
    pub chunks: Vec<ChunkInfo>,
    /// Run start, Unix epoch milliseconds
    pub start_time: i64,
    /// Run end, Unix epoch milliseconds
    pub end_time: i64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, error: RunError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_chunk(mut self, chunk: ChunkInfo) -> Self {
        self.chunks.push(chunk);
        self
    }

    pub fn with_timing(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_host_values_are_unset() {
        let host = HostOutput::new().with_public_path("").with_path("");
        assert!(host.public_path().is_none());
        assert!(host.output_path().is_none());
    }

    #[test]
    fn test_host_values_pass_through() {
        let host = HostOutput::new()
            .with_public_path("/static/")
            .with_path("/dist");
        assert_eq!(host.public_path(), Some("/static/"));
        assert_eq!(host.output_path(), Some(Path::new("/dist")));
    }

    #[test]
    fn test_run_stats_builder() {
        let stats = RunStats::new()
            .with_chunk(ChunkInfo::new("main", ["main.js", "main.js.map"]))
            .with_timing(1, 2);
        assert!(!stats.has_errors());
        assert_eq!(stats.chunks[0].files, vec!["main.js", "main.js.map"]);
        assert_eq!((stats.start_time, stats.end_time), (1, 2));
    }
}
