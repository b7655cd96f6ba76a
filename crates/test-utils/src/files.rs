//! Helpers for mutating real files in tests.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

/// Write `contents` to `dir/rel`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, contents: &[u8]) -> Result<PathBuf> {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
    }
    fs::write(&path, contents).with_context(|| format!("writing file {:?}", path))?;
    Ok(path)
}

/// Append bytes, changing the file size.
pub fn append(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("opening {:?} for append", path))?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Move the mtime forward by `secs` seconds without touching the contents.
pub fn bump_mtime(path: &Path, secs: u64) -> Result<SystemTime> {
    let current = fs::metadata(path)?.modified()?;
    let next = current + Duration::from_secs(secs);
    File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("opening {:?} to set mtime", path))?
        .set_modified(next)?;
    Ok(next)
}
