// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod scan;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{build_watch_set, WatchSupervisor};

pub use crate::errors::{PollwatchError, ScanError, StatError};
pub use crate::scan::{scan, DirectoryScanner};
pub use crate::types::{ChangeKind, FileChangeEvent};
pub use crate::watch::{
    detect, detect_blocking, supervise_all, ChangeDetector, MetadataSnapshot, SupervisorHandle,
};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - building the watch set (scan roots + explicit paths)
/// - one watch unit per path
/// - printing events until every unit stopped or Ctrl-C
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_or_default(args.config.as_deref())?;
    args.apply_overrides(&mut raw);
    let cfg = ConfigFile::try_from(raw)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let watch_set = watch_set_from_config(Arc::clone(&fs), &cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &watch_set);
        return Ok(());
    }

    if watch_set.is_empty() {
        warn!("watch set is empty; nothing to watch");
        return Ok(());
    }

    let (tx, mut rx) = mpsc::channel(cfg.watch_section().channel_capacity);
    let handle = WatchSupervisor::new(fs).supervise_all(
        watch_set,
        tx,
        cfg.watch_section().poll_interval_ms,
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => println!("{event}"),
                None => {
                    info!("every watch unit has stopped; exiting");
                    break;
                }
            },
            res = &mut ctrl_c => {
                match res {
                    Ok(()) => info!("Ctrl-C received; shutting down"),
                    Err(e) => warn!("failed to listen for Ctrl-C: {e}; shutting down"),
                }
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Build the watch set described by `cfg`, applying its depth cap.
pub fn watch_set_from_config(
    fs: Arc<dyn FileSystem>,
    cfg: &ConfigFile,
) -> errors::Result<Vec<PathBuf>> {
    let mut scanner = DirectoryScanner::new(fs);
    if let Some(max_depth) = cfg.max_depth() {
        scanner = scanner.with_max_depth(max_depth);
    }
    build_watch_set(&scanner, cfg.scan_section())
}

/// Simple dry-run output: effective settings and the watch set.
fn print_dry_run(cfg: &ConfigFile, watch_set: &[PathBuf]) {
    let watch = cfg.watch_section();
    let scan = cfg.scan_section();

    println!("pollwatch dry-run");
    println!("  watch.poll_interval_ms = {}", watch.poll_interval_ms);
    println!("  watch.channel_capacity = {}", watch.channel_capacity);
    println!("  scan.roots = {:?}", scan.roots);
    println!("  scan.depth = {}", scan.depth);
    match cfg.max_depth() {
        Some(max) => println!("  scan.max_depth = {max}"),
        None => println!("  scan.max_depth = unbounded"),
    }
    if !scan.exclude.is_empty() {
        println!("  scan.exclude = {:?}", scan.exclude);
    }
    println!();

    println!("watch set ({}):", watch_set.len());
    for path in watch_set {
        println!("  - {}", path.display());
    }

    debug!("dry-run complete (nothing watched)");
}
