// src/errors.rs

//! Crate-wide error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A metadata query (stat) failed for a watched path.
///
/// This is terminal for the detector watching `path`; it travels to the
/// consumer inside a [`crate::types::FileChangeEvent`] instead of being
/// returned as an `Err`.
#[derive(Error, Debug)]
#[error("failed to stat {path:?}: {source}")]
pub struct StatError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl StatError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

/// Failure of a directory scan. Any of these aborts the whole scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory {path:?} is nested deeper than the maximum scan depth of {max_depth}")]
    DepthLimitExceeded { path: PathBuf, max_depth: usize },
}

impl ScanError {
    /// The directory the scan failed on.
    pub fn path(&self) -> &PathBuf {
        match self {
            ScanError::DirectoryRead { path, .. } => path,
            ScanError::DepthLimitExceeded { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid exclude pattern: {0}")]
    PatternError(#[from] globset::Error),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PollwatchError>;
