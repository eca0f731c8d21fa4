//! Snapshot persistence
//!
//! [`FsSink`] writes each snapshot as compact JSON, creating parent
//! directories as needed. The document is written to a temporary sibling
//! file and renamed over the destination, so a reader polling the stats file
//! sees either the previous document or the new one, never a partial write.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, TrackerError};
use crate::snapshot::Snapshot;

/// Capability to persist a snapshot at a path, replacing prior contents.
pub trait SnapshotSink: Send {
    fn write_snapshot(&self, path: &Path, snapshot: &Snapshot) -> Result<()>;
}

impl<T: SnapshotSink + Sync + ?Sized> SnapshotSink for Arc<T> {
    fn write_snapshot(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        (**self).write_snapshot(path, snapshot)
    }
}

impl<T: SnapshotSink + ?Sized> SnapshotSink for Box<T> {
    fn write_snapshot(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        (**self).write_snapshot(path, snapshot)
    }
}

/// Filesystem sink
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FsSink {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotSink for FsSink {
    fn write_snapshot(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        write_atomic(path, &bytes)
    }
}

/// Write `contents` to `path` via a temporary sibling file and a rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TrackerError::create_dir(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = fs::write(&temp_path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(TrackerError::write(path, e));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        TrackerError::write(path, e)
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// In-memory sink that records every write in order
///
/// Clones share the same log, so a test can keep one handle while the
/// tracker owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<(PathBuf, Snapshot)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes so far, oldest first
    pub fn writes(&self) -> Vec<(PathBuf, Snapshot)> {
        self.writes.lock().clone()
    }

    /// Snapshots written so far, oldest first
    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.writes
            .lock()
            .iter()
            .map(|(_, snapshot)| snapshot.clone())
            .collect()
    }

    /// Most recent snapshot, i.e. what the stats file would contain now
    pub fn last(&self) -> Option<Snapshot> {
        self.writes.lock().last().map(|(_, snapshot)| snapshot.clone())
    }

    pub fn len(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.lock().is_empty()
    }
}

impl SnapshotSink for MemorySink {
    fn write_snapshot(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        self.writes
            .lock()
            .push((path.to_path_buf(), snapshot.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(
            temp_path_for(Path::new("/out/stats.json")),
            PathBuf::from("/out/stats.json.tmp")
        );
    }

    #[test]
    fn test_memory_sink_shares_log_between_clones() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.write_snapshot(Path::new("a.json"), &Snapshot::compiling())
            .unwrap();
        assert_eq!(handle.len(), 1);
        assert_eq!(handle.last(), Some(Snapshot::compiling()));
        assert_eq!(handle.writes()[0].0, PathBuf::from("a.json"));
    }
}
