// src/watch/watch_set.rs

//! Building the watch set handed to the supervisor.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};

use crate::config::ScanSection;
use crate::errors::Result;
use crate::fs::normalize;
use crate::scan::DirectoryScanner;

/// Compiled `[scan].exclude` patterns.
///
/// Scanned files are matched by their path relative to the scan root;
/// explicit paths are matched as written. Separators are normalised to `/`.
#[derive(Clone, Default)]
pub struct ExcludeFilter {
    set: Option<GlobSet>,
}

impl fmt::Debug for ExcludeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeFilter")
            .field("patterns", &self.set.as_ref().map_or(0, GlobSet::len))
            .finish()
    }
}

impl ExcludeFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            builder.add(Glob::new(pat)?);
        }
        Ok(Self {
            set: Some(builder.build()?),
        })
    }

    pub fn is_excluded(&self, root: Option<&Path>, path: &Path) -> bool {
        let Some(set) = &self.set else {
            return false;
        };
        let rel = root
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        set.is_match(rel.to_string_lossy().replace('\\', "/"))
    }
}

/// Scan every root, append the explicit paths, drop excluded and duplicate
/// entries, and return the result in first-seen order.
///
/// Any scan failure aborts the whole build: a truncated watch set would
/// silently under-watch.
pub fn build_watch_set(scanner: &DirectoryScanner, scan: &ScanSection) -> Result<Vec<PathBuf>> {
    let filter = ExcludeFilter::new(&scan.exclude)?;
    let mut seen = HashSet::new();
    let mut watch_set = Vec::new();

    for root in &scan.roots {
        let root = normalize(root);
        for path in scanner.scan(&root, scan.depth)? {
            if filter.is_excluded(Some(&root), &path) {
                debug!(?path, "excluded from watch set");
                continue;
            }
            if seen.insert(path.clone()) {
                watch_set.push(path);
            }
        }
    }

    for path in &scan.paths {
        let path = normalize(path);
        if filter.is_excluded(None, &path) {
            debug!(?path, "excluded from watch set");
            continue;
        }
        if seen.insert(path.clone()) {
            watch_set.push(path);
        }
    }

    info!(paths = watch_set.len(), "watch set built");
    Ok(watch_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::sync::Arc;

    fn section(roots: &[&str], depth: i64, exclude: &[&str], paths: &[&str]) -> ScanSection {
        ScanSection {
            roots: roots.iter().map(PathBuf::from).collect(),
            depth,
            max_depth: 0,
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            paths: paths.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn exclude_matches_relative_to_root() {
        let filter = ExcludeFilter::new(&["sub/*.log".to_string()]).unwrap();
        assert!(filter.is_excluded(Some(Path::new("/r")), Path::new("/r/sub/a.log")));
        assert!(!filter.is_excluded(Some(Path::new("/r")), Path::new("/r/a.log")));
        assert!(!ExcludeFilter::default().is_excluded(None, Path::new("x")));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(ExcludeFilter::new(&["a[".to_string()]).is_err());
    }

    #[test]
    fn combines_roots_and_paths_without_duplicates() {
        let fs = MockFileSystem::new();
        fs.add_file("/r/a.txt", "a");
        fs.add_file("/r/b.swp", "b");
        fs.add_file("/r/sub/c.txt", "c");
        fs.add_file("/other/d.txt", "d");
        let scanner = DirectoryScanner::new(Arc::new(fs));

        let cfg = section(&["/r", "/r/"], -1, &["**/*.swp"], &["/other/d.txt", "/r/a.txt"]);
        let set = build_watch_set(&scanner, &cfg).unwrap();
        assert_eq!(
            set,
            vec![
                PathBuf::from("/r/a.txt"),
                PathBuf::from("/r/sub/c.txt"),
                PathBuf::from("/other/d.txt"),
            ]
        );
    }

    #[test]
    fn scan_failure_aborts_build() {
        let fs = MockFileSystem::new();
        fs.add_file("/r/a.txt", "a");
        let scanner = DirectoryScanner::new(Arc::new(fs));

        let cfg = section(&["/r", "/missing"], 1, &[], &[]);
        assert!(build_watch_set(&scanner, &cfg).is_err());
    }
}
