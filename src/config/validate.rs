// src/config/validate.rs

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PollwatchError, Result};
use crate::watch::watch_set::ExcludeFilter;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PollwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.scan))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_sources(cfg)?;
    validate_watch_section(cfg)?;
    validate_scan_section(cfg)?;
    Ok(())
}

fn ensure_has_sources(cfg: &RawConfigFile) -> Result<()> {
    if cfg.scan.roots.is_empty() && cfg.scan.paths.is_empty() {
        return Err(PollwatchError::ConfigError(
            "[scan] needs at least one entry in `roots` or `paths`".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.channel_capacity == 0 {
        return Err(PollwatchError::ConfigError(
            "[watch].channel_capacity must be >= 1 (got 0)".to_string(),
        ));
    }

    // Zero is legal and never clamped; it just costs a core per path.
    if cfg.watch.poll_interval_ms == 0 {
        warn!("[watch].poll_interval_ms = 0 makes every watched path busy-poll");
    }

    Ok(())
}

fn validate_scan_section(cfg: &RawConfigFile) -> Result<()> {
    let max_depth = cfg.scan.max_depth as u64;
    if max_depth > 0 && cfg.scan.depth > 0 && cfg.scan.depth as u64 > max_depth {
        return Err(PollwatchError::ConfigError(format!(
            "[scan].depth ({}) exceeds [scan].max_depth ({})",
            cfg.scan.depth, max_depth
        )));
    }

    ExcludeFilter::new(&cfg.scan.exclude)?;
    Ok(())
}
