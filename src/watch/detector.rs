// src/watch/detector.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::fs::{FileSystem, RealFileSystem};
use crate::types::FileChangeEvent;
use crate::watch::snapshot::MetadataSnapshot;

/// Polls a single path until its metadata differs from a baseline or the stat
/// fails.
///
/// The detector keeps the last observed snapshot between calls, so each call
/// to [`detect`](Self::detect) reports the next change relative to the state
/// seen when the previous change was reported.
///
/// A poll interval of zero busy-polls the file system. That burns a core per
/// watched path and is only sensible in tests.
#[derive(Debug)]
pub struct ChangeDetector {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    interval: Duration,
    baseline: Option<MetadataSnapshot>,
}

impl ChangeDetector {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>, poll_interval_ms: u64) -> Self {
        Self {
            fs,
            path: path.into(),
            interval: Duration::from_millis(poll_interval_ms),
            baseline: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn poll_interval(&self) -> Duration {
        self.interval
    }

    pub fn baseline(&self) -> Option<MetadataSnapshot> {
        self.baseline
    }

    /// Take the baseline snapshot now instead of lazily on the first
    /// `detect` call.
    ///
    /// Returns the error event that `detect` would have produced if the
    /// stat fails.
    pub fn prime(&mut self) -> Result<MetadataSnapshot, FileChangeEvent> {
        match MetadataSnapshot::capture(self.fs.as_ref(), &self.path) {
            Ok(snapshot) => {
                trace!(path = ?self.path, ?snapshot, "baseline captured");
                self.baseline = Some(snapshot);
                Ok(snapshot)
            }
            Err(err) => {
                self.baseline = None;
                Err(FileChangeEvent::failed(&self.path, err))
            }
        }
    }

    /// Wait for the next change, sleeping asynchronously between polls.
    pub async fn detect(&mut self) -> FileChangeEvent {
        if let Err(event) = self.ensure_baseline() {
            return event;
        }
        loop {
            if self.interval.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.interval).await;
            }
            if let Some(event) = self.poll_once() {
                return event;
            }
        }
    }

    /// Wait for the next change, blocking the current thread between polls.
    pub fn detect_blocking(&mut self) -> FileChangeEvent {
        if let Err(event) = self.ensure_baseline() {
            return event;
        }
        loop {
            std::thread::sleep(self.interval);
            if let Some(event) = self.poll_once() {
                return event;
            }
        }
    }

    fn ensure_baseline(&mut self) -> Result<(), FileChangeEvent> {
        if self.baseline.is_none() {
            self.prime()?;
        }
        Ok(())
    }

    /// One stat-and-compare cycle. `None` means nothing changed.
    fn poll_once(&mut self) -> Option<FileChangeEvent> {
        let current = match MetadataSnapshot::capture(self.fs.as_ref(), &self.path) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                debug!(path = ?self.path, error = %err, "stat failed during poll");
                self.baseline = None;
                return Some(FileChangeEvent::failed(&self.path, err));
            }
        };

        let kind = match self.baseline {
            Some(baseline) => baseline.diff(&current)?,
            None => {
                self.baseline = Some(current);
                return None;
            }
        };

        debug!(path = ?self.path, %kind, "change detected");
        self.baseline = Some(current);
        Some(FileChangeEvent::changed(&self.path, kind))
    }
}

/// One-shot async detection on the real file system.
pub async fn detect(path: impl Into<PathBuf>, poll_interval_ms: u64) -> FileChangeEvent {
    ChangeDetector::new(Arc::new(RealFileSystem), path, poll_interval_ms)
        .detect()
        .await
}

/// One-shot blocking detection on the real file system.
pub fn detect_blocking(path: impl Into<PathBuf>, poll_interval_ms: u64) -> FileChangeEvent {
    ChangeDetector::new(Arc::new(RealFileSystem), path, poll_interval_ms).detect_blocking()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::types::ChangeKind;

    fn detector(fs: &MockFileSystem, path: &str) -> ChangeDetector {
        ChangeDetector::new(Arc::new(fs.clone()), path, 1)
    }

    #[test]
    fn missing_file_fails_without_polling() {
        let fs = MockFileSystem::new();
        let mut det = ChangeDetector::new(Arc::new(fs), "/nope", 60_000);

        let event = det.detect_blocking();
        assert!(event.is_terminal());
        assert_eq!(event.path(), Path::new("/nope"));
        assert!(det.baseline().is_none());
    }

    #[test]
    fn blocking_detect_reports_size_change() {
        let fs = MockFileSystem::new();
        fs.add_file("/f", "abc");
        let mut det = detector(&fs, "/f");
        det.prime().unwrap();

        fs.append("/f", b"d").unwrap();
        let event = det.detect_blocking();
        assert_eq!(event.kind(), Some(ChangeKind::SizeChanged));
        assert_eq!(det.baseline().map(|b| b.size()), Some(4));
    }

    #[test]
    fn poll_once_is_quiet_without_changes() {
        let fs = MockFileSystem::new();
        fs.add_file("/f", "abc");
        let mut det = detector(&fs, "/f");
        det.prime().unwrap();

        assert!(det.poll_once().is_none());
        fs.touch("/f").unwrap();
        assert_eq!(
            det.poll_once().and_then(|e| e.kind()),
            Some(ChangeKind::ModTimeChanged)
        );
        assert!(det.poll_once().is_none());
    }
}
