//! Walks a directory tree and collects the media files worth inspecting.

use crate::config::ScanConfig;
use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub fn scan(root: &Path, cfg: &ScanConfig) -> anyhow::Result<Vec<PathBuf>> {
    let exclude_set = build_globset(&cfg.exclude)?;
    let extensions: Vec<String> = cfg
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(cfg.follow_links)
        .into_iter()
        .filter_entry(|e| !is_excluded(e.path(), &exclude_set))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if has_supported_extension(entry.path(), &extensions) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

pub fn has_supported_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid exclude pattern {pat:?}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn is_excluded(path: &Path, excludes: &GlobSet) -> bool {
    excludes.is_match(path)
}
