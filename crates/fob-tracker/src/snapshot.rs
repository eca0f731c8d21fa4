//! Status snapshot data model
//!
//! A [`Snapshot`] is the whole JSON document written to the stats file. Its
//! `status` field tags the lifecycle phase:
//!
//! ```json
//! {"status":"compiling"}
//! {"status":"error","error":"ModuleBuildError","file":"a.js","message":"boom"}
//! {"status":"error","error":"Error","message":"failed","chunks":{}}
//! {"status":"done","chunks":{"main":[{"name":"main.js"}]},"publicPath":"/static/"}
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Chunk name → files emitted for that chunk, in emission order.
pub type ChunkMap = IndexMap<String, Vec<EmittedFile>>;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Compiling,
    Error,
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Compiling => write!(f, "compiling"),
            Phase::Error => write!(f, "error"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// One output file belonging to a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedFile {
    /// File name relative to the output directory
    pub name: String,

    /// Public URL of the file (host public path + name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    /// Absolute filesystem path of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl EmittedFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_path: None,
            path: None,
        }
    }

    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = Some(public_path.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Error payload of an `error` snapshot
///
/// A module failure is reported while the run is still going; a run failure
/// is reported once the run has finished and carries whatever chunks were
/// known at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorReport {
    /// Errors surfaced when the run finished (first error only)
    Run {
        error: String,
        message: String,
        chunks: ChunkMap,
    },

    /// A single module failed to build
    Module {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ErrorReport {
    /// Error kind name, e.g. `ModuleBuildError`
    pub fn kind(&self) -> &str {
        match self {
            ErrorReport::Run { error, .. } | ErrorReport::Module { error, .. } => error,
        }
    }
}

/// Phase-specific body of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Status {
    Compiling,
    Error(ErrorReport),
    Done {
        chunks: ChunkMap,
        #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
        start_time: Option<i64>,
        #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
        end_time: Option<i64>,
    },
}

/// The complete stats document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub status: Status,

    /// Host public path, present whenever the host has one configured
    #[serde(rename = "publicPath", default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
}

impl Snapshot {
    pub fn compiling() -> Self {
        Self::from_status(Status::Compiling)
    }

    pub fn module_error(
        kind: impl Into<String>,
        file: Option<String>,
        message: Option<String>,
    ) -> Self {
        Self::from_status(Status::Error(ErrorReport::Module {
            error: kind.into(),
            file,
            message,
        }))
    }

    pub fn run_error(kind: impl Into<String>, message: impl Into<String>, chunks: ChunkMap) -> Self {
        Self::from_status(Status::Error(ErrorReport::Run {
            error: kind.into(),
            message: message.into(),
            chunks,
        }))
    }

    pub fn done(chunks: ChunkMap, timing: Option<(i64, i64)>) -> Self {
        let (start_time, end_time) = match timing {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        Self::from_status(Status::Done {
            chunks,
            start_time,
            end_time,
        })
    }

    fn from_status(status: Status) -> Self {
        Self {
            status,
            public_path: None,
        }
    }

    /// Attach the host public path (empty strings are treated as unset)
    pub fn with_public_path(mut self, public_path: Option<&str>) -> Self {
        self.public_path = public_path
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        self
    }

    pub fn phase(&self) -> Phase {
        match self.status {
            Status::Compiling => Phase::Compiling,
            Status::Error(_) => Phase::Error,
            Status::Done { .. } => Phase::Done,
        }
    }

    /// Chunk map carried by this snapshot, if its shape has one
    pub fn chunks(&self) -> Option<&ChunkMap> {
        match &self.status {
            Status::Done { chunks, .. } | Status::Error(ErrorReport::Run { chunks, .. }) => {
                Some(chunks)
            }
            _ => None,
        }
    }

    /// Compact JSON rendering, as written to disk
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
