// src/fs/mod.rs

use std::ffi::OsString;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::watch::snapshot::MetadataSnapshot;

pub mod mock;

/// File-system type of a directory entry, classified without following
/// symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    /// Devices, sockets, FIFOs and anything else.
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One entry returned by [`FileSystem::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

/// Abstract filesystem interface.
///
/// Everything the watcher and scanner need: a stat-equivalent metadata query
/// and a directory listing with per-entry types.
pub trait FileSystem: Send + Sync + Debug {
    /// Size and modification time of `path`, following symlinks.
    fn stat(&self, path: &Path) -> io::Result<MetadataSnapshot>;

    /// Entries of the directory at `path`, in enumeration order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// Implementation that uses `std::fs`.
///
/// `read_dir` sorts entries by file name so enumeration order is stable
/// across platforms.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn stat(&self, path: &Path) -> io::Result<MetadataSnapshot> {
        let meta = fs::metadata(path)?;
        Ok(MetadataSnapshot::new(meta.len(), meta.modified()?))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(DirEntry {
                name: entry.file_name(),
                kind: entry.file_type()?.into(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Collapse repeated and trailing separators, e.g. `"dir//sub/"` → `"dir/sub"`.
pub fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path.components().collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_and_repeated_separators() {
        assert_eq!(normalize(Path::new("dir//sub/")), PathBuf::from("dir/sub"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("/")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn real_read_dir_is_sorted_and_typed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let entries = RealFileSystem.read_dir(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
        assert_eq!(entries[2].kind, EntryKind::Dir);
    }

    #[test]
    fn real_stat_reports_length() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"12345").unwrap();

        let snap = RealFileSystem.stat(&file).unwrap();
        assert_eq!(snap.size(), 5);
        assert!(RealFileSystem.stat(&dir.path().join("missing")).is_err());
    }
}
