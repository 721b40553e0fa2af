//! Error types for Knit core.
//!
//! Failures are split by pipeline stage so callers can decide what is fatal:
//! [`ExtractionError`] aborts a request, [`ScanError`] and [`DetectionError`]
//! are recorded in the result and the pipeline keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Knit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum Error {
    /// The uploaded archive could not be unpacked.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// A source file could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A detection stage failed.
    #[error(transparent)]
    Detection(#[from] DetectionError),

    /// The directory to analyze does not exist or is not a directory.
    #[error("Project root not found: {path}")]
    ProjectRootNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// Configuration is invalid.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Path escapes the directory it must stay in.
    #[error("Path traversal: {attempted_path:?} outside {project_root:?}")]
    PathTraversal {
        attempted_path: PathBuf,
        project_root: PathBuf,
    },

    /// Invalid path
    #[error("Invalid path {path:?}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Archive-level failures. Always fatal for the upload being processed.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The byte stream is not a readable archive.
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// An entry would be written outside the working directory.
    #[error("Path traversal: archive entry {entry:?} escapes {root:?}")]
    PathTraversal { entry: String, root: PathBuf },

    #[error("Archive has more than {max_allowed} entries")]
    TooManyEntries { max_allowed: usize },

    #[error("Archive entry {entry:?} is {size} bytes, max allowed is {max_allowed}")]
    EntryTooLarge {
        entry: String,
        size: u64,
        max_allowed: u64,
    },

    #[error("Archive expands to more than {max_allowed} bytes")]
    ArchiveTooLarge { max_allowed: u64 },

    /// Disk I/O failed while unpacking.
    #[error("I/O error while extracting {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-file failures. Recorded, then scanning continues with the next file.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The file could not be read or is not valid UTF-8.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walk could not be set up, e.g. an invalid ignore pattern.
    #[error("File discovery failed under {root}: {message}")]
    Discovery { root: PathBuf, message: String },

    /// One entry could not be walked. The rest of the tree is still scanned.
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// A matching file over the discovery size limit. It is not read.
    #[error("Skipped {path}: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Failures inside a detection stage. Recorded, remaining stages still run.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// Graph too large for analysis
    #[error("Graph has {node_count} nodes, max allowed is {max_allowed}")]
    GraphTooLarge {
        node_count: usize,
        max_allowed: usize,
    },

    /// Any other stage-specific failure.
    #[error("{message}")]
    Stage { message: String },
}

impl ExtractionError {
    /// Wraps an I/O error with the path that was being written.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
