// src/watch/snapshot.rs

use std::path::Path;
use std::time::SystemTime;

use crate::errors::StatError;
use crate::fs::FileSystem;
use crate::types::ChangeKind;

/// Size and modification time of a path at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataSnapshot {
    size: u64,
    modified: SystemTime,
}

impl MetadataSnapshot {
    pub fn new(size: u64, modified: SystemTime) -> Self {
        Self { size, modified }
    }

    /// Stat `path` through `fs`.
    pub fn capture(fs: &dyn FileSystem, path: &Path) -> Result<Self, StatError> {
        fs.stat(path).map_err(|source| StatError::new(path, source))
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Classify how `current` differs from `self`, size first.
    pub fn diff(&self, current: &MetadataSnapshot) -> Option<ChangeKind> {
        if self.size != current.size {
            Some(ChangeKind::SizeChanged)
        } else if self.modified != current.modified {
            Some(ChangeKind::ModTimeChanged)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn identical_snapshots_have_no_diff() {
        let a = MetadataSnapshot::new(10, at(5));
        assert_eq!(a.diff(&a), None);
    }

    #[test]
    fn size_takes_precedence_over_mtime() {
        let base = MetadataSnapshot::new(10, at(5));
        assert_eq!(
            base.diff(&MetadataSnapshot::new(11, at(6))),
            Some(ChangeKind::SizeChanged)
        );
        assert_eq!(
            base.diff(&MetadataSnapshot::new(9, at(5))),
            Some(ChangeKind::SizeChanged)
        );
    }

    #[test]
    fn mtime_only_change() {
        let base = MetadataSnapshot::new(10, at(5));
        assert_eq!(
            base.diff(&MetadataSnapshot::new(10, at(4))),
            Some(ChangeKind::ModTimeChanged)
        );
    }
}
