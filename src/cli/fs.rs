//! Root file set discovery from `files`/`include`/`exclude`.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DEFAULT_INCLUDE: &[&str] = &["**/*.ts", "**/*.tsx", "**/*.mts", "**/*.cts"];

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

pub struct FileDiscoveryOptions {
    /// Directory the configuration file lives in; patterns are relative to it.
    pub base_dir: PathBuf,
    /// Explicit `files` list. When present it is the root set verbatim.
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    /// Excluded from discovery so a previous run's output is never re-input.
    pub out_dir: Option<PathBuf>,
}

/// Expand the configuration's file patterns into an ordered root file set.
///
/// Extension-less wildcard includes only match supported source extensions;
/// a pattern must name an extension itself to pull in anything else.
pub fn discover_source_files(options: &FileDiscoveryOptions) -> Result<Vec<PathBuf>> {
    if let Some(files) = options.files.as_ref() {
        return Ok(files
            .iter()
            .map(|file| options.base_dir.join(file))
            .collect());
    }

    let include_patterns = options
        .include
        .as_deref()
        .map(|patterns| normalize_patterns(patterns))
        .unwrap_or_else(|| DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect());
    let names_extension: Vec<bool> = include_patterns
        .iter()
        .map(|pattern| pattern_names_extension(pattern))
        .collect();
    let include = build_glob_set(include_patterns).context("invalid include pattern")?;

    let mut exclude_patterns = options
        .exclude
        .as_deref()
        .map(|patterns| normalize_patterns(patterns))
        .unwrap_or_default();
    exclude_patterns.push("node_modules/**".to_string());
    if let Some(out_dir) = options.out_dir.as_ref() {
        // Globs are tested against base-dir-relative paths.
        let relative = out_dir.strip_prefix(&options.base_dir).unwrap_or(out_dir);
        exclude_patterns.push(format!("{}/**", relative.display()));
    }
    let exclude = build_glob_set(exclude_patterns).context("invalid exclude pattern")?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&options.base_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "node_modules")
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Unreadable subtrees are skipped, not fatal.
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&options.base_dir) else {
            continue;
        };
        let matched = include.matches(relative);
        if matched.is_empty() || exclude.is_match(relative) {
            continue;
        }
        if is_source_file(relative) || matched.iter().any(|&index| names_extension[index]) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn build_glob_set(patterns: Vec<String>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(&pattern)?);
    }
    Ok(builder.build()?)
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| SOURCE_EXTENSIONS.contains(&extension))
}

/// Whether the pattern's final segment names a file extension.
fn pattern_names_extension(pattern: &str) -> bool {
    pattern
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

/// Bare directory names in tsconfig patterns mean "everything underneath".
fn normalize_patterns(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|pattern| {
            let trimmed = pattern.trim().trim_end_matches('/');
            if trimmed.contains('*') || trimmed.rsplit('/').next().is_some_and(|p| p.contains('.'))
            {
                trimmed.to_string()
            } else {
                format!("{trimmed}/**/*.{{ts,tsx,mts,cts}}")
            }
        })
        .collect()
}
