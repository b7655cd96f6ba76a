use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::StatError;

/// What differed between a baseline snapshot and the current one.
///
/// Size is checked first: when both size and modification time changed in the
/// same poll cycle the change is reported as `SizeChanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    SizeChanged,
    ModTimeChanged,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::SizeChanged => f.write_str("size"),
            ChangeKind::ModTimeChanged => f.write_str("mtime"),
        }
    }
}

/// A single result produced by a change detector.
///
/// Carries either a detected change (the watcher keeps running) or the stat
/// error that permanently stopped the watcher for this path.
#[derive(Debug)]
pub struct FileChangeEvent {
    path: PathBuf,
    outcome: Result<ChangeKind, StatError>,
}

impl FileChangeEvent {
    pub fn changed(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            outcome: Ok(kind),
        }
    }

    pub fn failed(path: impl Into<PathBuf>, error: StatError) -> Self {
        Self {
            path: path.into(),
            outcome: Err(error),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The detected change, or `None` for an error event.
    pub fn kind(&self) -> Option<ChangeKind> {
        self.outcome.as_ref().ok().copied()
    }

    /// The stat error, or `None` for a change event.
    pub fn error(&self) -> Option<&StatError> {
        self.outcome.as_ref().err()
    }

    /// True when no further events will be produced for this path.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn into_result(self) -> Result<ChangeKind, StatError> {
        self.outcome
    }
}

impl fmt::Display for FileChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(kind) => write!(f, "changed {kind} {}", self.path.display()),
            Err(err) => write!(f, "stopped {}: {}", self.path.display(), err.source),
        }
    }
}
