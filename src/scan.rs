// src/scan.rs

//! Depth-bounded directory enumeration that produces the watch set.
//!
//! Depth semantics:
//! - `1` (or `0`) lists the root's own files only.
//! - `n > 1` descends `n - 1` further levels.
//! - any negative value descends without bound.
//!
//! Only regular files are listed and only real directories are descended
//! into. Symlinks, devices, sockets and FIFOs are skipped entirely, which also
//! means a scan can never follow a symlink loop.
//!
//! Scans are all-or-nothing: if any directory on the way cannot be read the
//! whole scan fails and no partial list is returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::errors::ScanError;
use crate::fs::{normalize, EntryKind, FileSystem, RealFileSystem};

#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    fs: Arc<dyn FileSystem>,
    max_depth: Option<usize>,
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl DirectoryScanner {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, max_depth: None }
    }

    /// Fail any scan that would descend more than `max_depth` levels below
    /// its root (the root's own files are level 1).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// List files under `root`, depth-first in enumeration order.
    pub fn scan(&self, root: impl AsRef<Path>, depth: i64) -> Result<Vec<PathBuf>, ScanError> {
        let root = normalize(root.as_ref());
        let mut files = Vec::new();
        self.scan_dir(&root, depth, 1, &mut files)?;
        debug!(?root, depth, files = files.len(), "directory scan complete");
        Ok(files)
    }

    fn scan_dir(
        &self,
        dir: &Path,
        depth: i64,
        level: usize,
        files: &mut Vec<PathBuf>,
    ) -> Result<(), ScanError> {
        if let Some(max_depth) = self.max_depth {
            if level > max_depth {
                return Err(ScanError::DepthLimitExceeded {
                    path: dir.to_path_buf(),
                    max_depth,
                });
            }
        }

        let entries = self
            .fs
            .read_dir(dir)
            .map_err(|source| ScanError::DirectoryRead {
                path: dir.to_path_buf(),
                source,
            })?;

        for entry in entries {
            let path = dir.join(&entry.name);
            match entry.kind {
                EntryKind::File => files.push(path),
                EntryKind::Dir if depth > 1 || depth < 0 => {
                    self.scan_dir(&path, depth.saturating_sub(1), level + 1, files)?;
                }
                EntryKind::Dir => {}
                EntryKind::Symlink | EntryKind::Other => {
                    trace!(?path, kind = ?entry.kind, "skipping non-regular entry");
                }
            }
        }
        Ok(())
    }
}

/// Scan `root` on the real file system with no depth safety cap.
pub fn scan(root: impl AsRef<Path>, depth: i64) -> Result<Vec<PathBuf>, ScanError> {
    DirectoryScanner::default().scan(root, depth)
}
