// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RawConfigFile;

/// Command-line arguments for `pollwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Watch files for size and modification-time changes by polling.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Pollwatch.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to scan for files. Repeatable; replaces `[scan].roots`.
    #[arg(long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Scan depth (1 = the root's own files, negative = unbounded).
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub depth: Option<i64>,

    /// Milliseconds between polls of each file (0 = busy-poll).
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Build and print the watch set, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Overlay command-line values onto a loaded config.
    pub fn apply_overrides(&self, raw: &mut RawConfigFile) {
        if !self.roots.is_empty() {
            raw.scan.roots = self.roots.clone();
        }
        if let Some(depth) = self.depth {
            raw.scan.depth = depth;
        }
        if let Some(ms) = self.interval_ms {
            raw.watch.poll_interval_ms = ms;
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = CliArgs::parse_from([
            "pollwatch",
            "--root",
            "a",
            "--root",
            "b",
            "--depth",
            "-1",
            "--interval-ms",
            "5",
        ]);
        let mut raw = RawConfigFile::default();
        args.apply_overrides(&mut raw);

        assert_eq!(raw.scan.roots, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(raw.scan.depth, -1);
        assert_eq!(raw.watch.poll_interval_ms, 5);
    }

    #[test]
    fn no_flags_keep_config_values() {
        let args = CliArgs::parse_from(["pollwatch"]);
        let mut raw = RawConfigFile::default();
        args.apply_overrides(&mut raw);

        assert_eq!(raw.scan.roots, vec![PathBuf::from("./")]);
        assert_eq!(raw.watch.poll_interval_ms, 100);
    }
}
