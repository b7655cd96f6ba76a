#![allow(dead_code)]

use std::path::PathBuf;

use pollwatch::config::{ConfigFile, RawConfigFile};
use pollwatch::errors::Result;

/// Builder for `RawConfigFile` / `ConfigFile` to simplify test setup.
///
/// Starts from an empty watch set (no roots) so tests state exactly what
/// they scan.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.scan.roots.clear();
        Self { config }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.scan.roots.push(root.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.scan.paths.push(path.into());
        self
    }

    pub fn with_exclude(mut self, pattern: &str) -> Self {
        self.config.scan.exclude.push(pattern.to_string());
        self
    }

    pub fn depth(mut self, depth: i64) -> Self {
        self.config.scan.depth = depth;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.scan.max_depth = max_depth;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.watch.poll_interval_ms = ms;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.watch.channel_capacity = capacity;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
