//! MeshConvertError: Unified error type for mesh-convert public APIs
//!
//! Every codec, the repair engine and the geometry transforms report failures
//! through this enum; nothing in the library panics on malformed input.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage reported by [`MeshConvertError::Conversion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    Read,
    Repair,
    Transform,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Repair => "repair",
            Stage::Transform => "transform",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Unified error type for mesh-convert operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshConvertError {
    /// The input file could not be opened.
    #[error("cannot open `{path}`: {reason}")]
    NotFound { path: PathBuf, reason: String },
    /// A count field did not parse, a required block is missing, or a data
    /// row is malformed. `line` is 1-based; `content` is the offending text.
    #[error("line {line}: {reason} (`{content}`)")]
    MalformedHeader {
        line: usize,
        content: String,
        reason: String,
    },
    /// The target format cannot represent cells of this width.
    #[error("{format} does not support cells with {width} vertices")]
    UnsupportedTopology { format: &'static str, width: usize },
    /// Mark array length differs from the cell count.
    #[error("mark count {marks} does not match cell count {cells}")]
    AttributeCountMismatch { marks: usize, cells: usize },
    /// A transform received the wrong number of parameters.
    #[error("{operation} expects {expected} parameters, got {found}")]
    InvalidParameterCount {
        operation: &'static str,
        expected: &'static str,
        found: usize,
    },
    /// A cell references a vertex that does not exist.
    #[error("vertex index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: i64, len: usize },
    /// Vertex tuples must have 2 or 3 coordinates.
    #[error("unsupported mesh dimension {0} (expected 2 or 3)")]
    InvalidDimension(usize),
    /// Rotation axis has zero length.
    #[error("rotation axis must be non-zero")]
    DegenerateAxis,
    /// Operation needs at least one vertex.
    #[error("{0} requires a non-empty mesh")]
    EmptyMesh(&'static str),
    /// File extension does not name a supported format.
    #[error("unknown mesh format `{0}`")]
    UnknownFormat(String),
    /// Underlying I/O failure while reading or writing a stream.
    #[error("I/O error: {0}")]
    Io(String),
    /// A pipeline step failed for a specific file.
    #[error("{stage} failed for `{path}`: {source}")]
    Conversion {
        path: PathBuf,
        stage: Stage,
        #[source]
        source: Box<MeshConvertError>,
    },
}

impl From<std::io::Error> for MeshConvertError {
    fn from(err: std::io::Error) -> Self {
        MeshConvertError::Io(err.to_string())
    }
}

impl MeshConvertError {
    /// Shorthand for a [`MeshConvertError::MalformedHeader`] at `line`.
    pub fn malformed(line: usize, content: &str, reason: impl Into<String>) -> Self {
        MeshConvertError::MalformedHeader {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach the file and pipeline stage to an error.
    pub fn in_stage(self, path: impl Into<PathBuf>, stage: Stage) -> Self {
        MeshConvertError::Conversion {
            path: path.into(),
            stage,
            source: Box::new(self),
        }
    }
}
