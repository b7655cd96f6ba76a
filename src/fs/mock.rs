// src/fs/mock.rs

use super::{normalize, DirEntry, EntryKind, FileSystem};
use crate::watch::snapshot::MetadataSnapshot;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { contents: Vec<u8>, modified: SystemTime },
    Dir(Vec<OsString>), // child names in enumeration order
    Symlink,
    Other,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<PathBuf, MockEntry>,
    denied: HashSet<PathBuf>,
    clock: u64,
}

impl State {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        UNIX_EPOCH + Duration::from_secs(1_700_000_000 + self.clock)
    }

    fn insert(&mut self, path: &Path, entry: MockEntry) {
        let path = normalize(path);
        if let Some(parent) = path.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            if parent != path {
                self.ensure_dir(parent);
                self.link_child(parent, &path);
            }
        }
        self.entries.insert(path, entry);
    }

    fn ensure_dir(&mut self, path: &Path) {
        if !self.entries.contains_key(path) {
            self.insert(path, MockEntry::Dir(Vec::new()));
        }
    }

    fn link_child(&mut self, parent: &Path, child: &Path) {
        if let (Some(MockEntry::Dir(children)), Some(name)) =
            (self.entries.get_mut(parent), child.file_name())
        {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_os_string());
            }
        }
    }

    fn check_access(&self, path: &Path) -> io::Result<()> {
        if self.denied.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {:?}", path),
            ));
        }
        Ok(())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no such file: {:?}", path))
}

/// In-memory file system for tests.
///
/// Modification times come from a private clock that advances one second per
/// mutation, so every write or touch is observable as an mtime change.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<State>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.lock().ensure_dir(Path::new("."));
        fs
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create or replace a regular file. Parent directories are created
    /// implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let mut state = self.lock();
        let modified = state.tick();
        state.insert(
            path.as_ref(),
            MockEntry::File {
                contents: contents.into(),
                modified,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.lock().ensure_dir(&normalize(path.as_ref()));
    }

    pub fn add_symlink(&self, path: impl AsRef<Path>) {
        self.lock().insert(path.as_ref(), MockEntry::Symlink);
    }

    /// A device, socket or FIFO.
    pub fn add_special(&self, path: impl AsRef<Path>) {
        self.lock().insert(path.as_ref(), MockEntry::Other);
    }

    /// Append bytes to a file, changing both its size and mtime.
    pub fn append(&self, path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
        let path = normalize(path.as_ref());
        let mut state = self.lock();
        let now = state.tick();
        match state.entries.get_mut(&path) {
            Some(MockEntry::File { contents, modified }) => {
                contents.extend_from_slice(bytes);
                *modified = now;
                Ok(())
            }
            _ => Err(not_found(&path)),
        }
    }

    /// Bump the mtime of a file without changing its contents.
    pub fn touch(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = normalize(path.as_ref());
        let mut state = self.lock();
        let now = state.tick();
        match state.entries.get_mut(&path) {
            Some(MockEntry::File { modified, .. }) => {
                *modified = now;
                Ok(())
            }
            _ => Err(not_found(&path)),
        }
    }

    /// Remove an entry (and, for directories, everything beneath it).
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let mut state = self.lock();
        state.entries.retain(|p, _| !p.starts_with(&path));
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                children.retain(|c| c != name);
            }
        }
    }

    /// Make every operation on `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.lock().denied.insert(normalize(path.as_ref()));
    }

    pub fn allow(&self, path: impl AsRef<Path>) {
        self.lock().denied.remove(&normalize(path.as_ref()));
    }
}

impl FileSystem for MockFileSystem {
    fn stat(&self, path: &Path) -> io::Result<MetadataSnapshot> {
        let path = normalize(path);
        let state = self.lock();
        state.check_access(&path)?;
        match state.entries.get(&path) {
            Some(MockEntry::File { contents, modified }) => {
                Ok(MetadataSnapshot::new(contents.len() as u64, *modified))
            }
            Some(MockEntry::Dir(_)) => Ok(MetadataSnapshot::new(0, UNIX_EPOCH)),
            Some(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("cannot stat special entry {:?}", path),
            )),
            None => Err(not_found(&path)),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let path = normalize(path);
        let state = self.lock();
        state.check_access(&path)?;
        match state.entries.get(&path) {
            Some(MockEntry::Dir(children)) => Ok(children
                .iter()
                .map(|name| {
                    let kind = match state.entries.get(&path.join(name)) {
                        Some(MockEntry::File { .. }) => EntryKind::File,
                        Some(MockEntry::Dir(_)) => EntryKind::Dir,
                        Some(MockEntry::Symlink) => EntryKind::Symlink,
                        _ => EntryKind::Other,
                    };
                    DirEntry {
                        name: name.clone(),
                        kind,
                    }
                })
                .collect()),
            Some(_) => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {:?}", path),
            )),
            None => Err(not_found(&path)),
        }
    }
}
