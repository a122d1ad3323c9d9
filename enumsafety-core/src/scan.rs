//! Package snapshot discovery and loading.
//!
//! A snapshot is one [`Package`] serialized as JSON by the host front end.
//! Directories are walked recursively with early pruning of build and VCS
//! directories; decoding runs in parallel.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{EnumSafetyError, EnumSafetyResult, IoResultExt};
use crate::model::Package;

/// Directories never descended into.
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules", "vendor", "testdata"];

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

fn is_snapshot(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "json")
}

/// All `*.json` files under `root`, sorted by path.
///
/// A file path is returned as is when it names a snapshot.
pub fn gather_snapshot_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(if is_snapshot(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) if is_snapshot(e.path()) => Some(Ok(e.path().to_path_buf())),
            Ok(_) => None,
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather snapshots from {}", root.display()))?;

    // par_bridge does not preserve walk order
    files.sort();
    Ok(files)
}

/// Decode one snapshot.
pub fn load_snapshot(path: &Path) -> EnumSafetyResult<Package> {
    let content = fs::read_to_string(path).with_path(path)?;
    serde_json::from_str(&content).map_err(|e| EnumSafetyError::snapshot(path, e.to_string()))
}

/// Gather and decode every snapshot reachable from `paths`, in path order.
pub fn load_packages(paths: &[PathBuf]) -> Result<Vec<Package>> {
    let mut files = Vec::new();
    for p in paths {
        if !p.exists() {
            return Err(EnumSafetyError::invalid_argument(format!(
                "path does not exist: {}",
                p.display()
            ))
            .into());
        }
        files.extend(gather_snapshot_files(p)?);
    }

    files
        .par_iter()
        .map(|f| load_snapshot(f).map_err(anyhow::Error::from))
        .collect()
}
