// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// poll_interval_ms = 100
/// channel_capacity = 64
///
/// [scan]
/// roots = ["./"]
/// depth = 2
/// max_depth = 64
/// exclude = ["**/*.swp"]
/// paths = ["Cargo.toml"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub scan: ScanSection,
}

/// `[watch]` section: how each path is polled.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Milliseconds between two stats of the same path. `0` busy-polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Capacity of the bounded event channel shared by all watch units.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// `[scan]` section: how the watch set is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    /// Directories to scan for files.
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,

    /// Recursion depth; `1` is the root's own files, negative is unbounded.
    #[serde(default = "default_depth")]
    pub depth: i64,

    /// Safety cap on recursion levels. `0` disables the cap.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Glob patterns; matching paths are dropped from the watch set.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Extra files watched as-is, without scanning.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("./")]
}

fn default_depth() -> i64 {
    1
}

fn default_max_depth() -> usize {
    64
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            depth: default_depth(),
            max_depth: default_max_depth(),
            exclude: Vec::new(),
            paths: Vec::new(),
        }
    }
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so holders can rely on its invariants.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
    scan: ScanSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, scan: ScanSection) -> Self {
        Self { watch, scan }
    }

    pub fn watch_section(&self) -> &WatchSection {
        &self.watch
    }

    pub fn scan_section(&self) -> &ScanSection {
        &self.scan
    }

    /// The recursion cap to hand to the scanner, if any.
    pub fn max_depth(&self) -> Option<usize> {
        match self.scan.max_depth {
            0 => None,
            n => Some(n),
        }
    }
}
