// src/watch/supervisor.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::fs::{FileSystem, RealFileSystem};
use crate::types::FileChangeEvent;
use crate::watch::detector::ChangeDetector;

/// Runs one [`ChangeDetector`] per path as independent tokio tasks and fans
/// their events into a single channel.
#[derive(Debug, Clone)]
pub struct WatchSupervisor {
    fs: Arc<dyn FileSystem>,
}

impl Default for WatchSupervisor {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl WatchSupervisor {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Start watching every path in `paths` and return immediately.
    ///
    /// Each path gets its own task, which forwards events to `sink` in the
    /// order they are detected. A task stops after forwarding an error event,
    /// or when `sink` is closed. Failed paths are never restarted.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn supervise_all<I, P>(
        &self,
        paths: I,
        sink: mpsc::Sender<FileChangeEvent>,
        poll_interval_ms: u64,
    ) -> SupervisorHandle
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        if poll_interval_ms == 0 {
            warn!("poll interval is 0ms; every watched path will busy-poll");
        }

        let units: Vec<WatchUnit> = paths
            .into_iter()
            .map(|path| {
                let detector = ChangeDetector::new(Arc::clone(&self.fs), path, poll_interval_ms);
                let path = detector.path().to_path_buf();
                let join = tokio::spawn(watch_path(detector, sink.clone()));
                WatchUnit { path, join }
            })
            .collect();

        info!(
            paths = units.len(),
            poll_interval_ms, "supervisor started watch units"
        );

        SupervisorHandle { units }
    }
}

/// [`WatchSupervisor::supervise_all`] on the real file system.
pub fn supervise_all<I, P>(
    paths: I,
    sink: mpsc::Sender<FileChangeEvent>,
    poll_interval_ms: u64,
) -> SupervisorHandle
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    WatchSupervisor::default().supervise_all(paths, sink, poll_interval_ms)
}

async fn watch_path(mut detector: ChangeDetector, sink: mpsc::Sender<FileChangeEvent>) {
    debug!(path = ?detector.path(), "watch unit started");

    loop {
        let event = detector.detect().await;
        let terminal = event.is_terminal();

        if let Some(err) = event.error() {
            warn!(path = ?detector.path(), error = %err.source, "watch unit stopping");
        }

        if sink.send(event).await.is_err() {
            debug!(path = ?detector.path(), "event sink closed; watch unit exiting");
            return;
        }

        if terminal {
            return;
        }
    }
}

struct WatchUnit {
    path: PathBuf,
    join: JoinHandle<()>,
}

/// Handle to the watch units started by one `supervise_all` call.
///
/// Dropping the handle leaves the units running in the background; use
/// [`stop_path`](Self::stop_path) or [`shutdown`](Self::shutdown) to stop
/// them.
pub struct SupervisorHandle {
    units: Vec<WatchUnit>,
}

impl fmt::Debug for SupervisorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisorHandle")
            .field("paths", &self.paths().collect::<Vec<_>>())
            .finish()
    }
}

impl SupervisorHandle {
    /// Watched paths, in watch-set order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.units.iter().map(|u| u.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// True while at least one unit for `path` has not finished.
    pub fn is_running(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.units
            .iter()
            .any(|u| u.path == path && !u.join.is_finished())
    }

    /// Number of units that have not finished yet.
    pub fn running(&self) -> usize {
        self.units.iter().filter(|u| !u.join.is_finished()).count()
    }

    /// Stop watching `path`. Returns false if it is not part of the watch
    /// set.
    pub fn stop_path(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let mut found = false;
        for unit in self.units.iter().filter(|u| u.path == path) {
            unit.join.abort();
            found = true;
        }
        if found {
            info!(?path, "stopped watching path");
        }
        found
    }

    /// Stop every unit and wait for all of them to finish.
    pub async fn shutdown(self) {
        for unit in &self.units {
            unit.join.abort();
        }
        for unit in self.units {
            if let Err(err) = unit.join.await {
                if !err.is_cancelled() {
                    warn!(path = ?unit.path, error = %err, "watch unit panicked");
                }
            }
        }
        debug!("supervisor shut down");
    }
}
