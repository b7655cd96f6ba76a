// src/watch/mod.rs

//! Polling-based change detection.
//!
//! - [`snapshot`]: size + mtime captured by one stat.
//! - [`detector`]: the per-path poll loop.
//! - [`supervisor`]: one detector task per path, fanned into one channel.
//! - [`watch_set`]: turning scan roots and explicit paths into the list of
//!   paths to supervise.
//!
//! There is no OS notification integration here; every change is found by
//! re-stating the file.

pub mod detector;
pub mod snapshot;
pub mod supervisor;
pub mod watch_set;

pub use detector::{detect, detect_blocking, ChangeDetector};
pub use snapshot::MetadataSnapshot;
pub use supervisor::{supervise_all, SupervisorHandle, WatchSupervisor};
pub use watch_set::{build_watch_set, ExcludeFilter};
