//! File discovery and hashing
//!
//! Walks the glob directory, matches files against the include and ignore
//! globs, and hashes the survivors into manifest entries. Everything here
//! is blocking IO; callers run it on a blocking thread.

use crate::config::{ManifestConfig, TemplatedSource};
use crate::error::{SwBuildError, SwBuildResult};
use crate::manifest::entry::ManifestEntry;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use globset::{Glob, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256, Sha384};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Result of scanning the glob directory
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Entries for matched files followed by templated URLs
    pub entries: Vec<ManifestEntry>,

    /// Total size in bytes of everything that made it into `entries`
    pub size: u64,

    /// Non-fatal problems found while scanning
    pub warnings: Vec<String>,
}

/// A file under the glob directory that is not ignored
struct Candidate {
    /// Path relative to the glob directory, `/`-separated
    relative: String,
    path: PathBuf,
}

/// Scan the glob directory described by `config`
pub fn scan(config: &ManifestConfig) -> SwBuildResult<ScanOutcome> {
    let root = &config.glob_directory;
    if !root.is_dir() {
        return Err(SwBuildError::PathNotFound(root.clone()));
    }

    let include = build_globset(&config.glob_patterns)?;
    let ignore = build_globset(&config.glob_ignores)?;
    let candidates = collect_candidates(root, &ignore)?;
    debug!(
        "Found {} candidate files under {}",
        candidates.len(),
        root.display()
    );

    let mut outcome = ScanOutcome::default();
    let mut pattern_used = vec![false; config.glob_patterns.len()];

    for candidate in &candidates {
        let hits = include.matches(&candidate.relative);
        if hits.is_empty() {
            continue;
        }
        for hit in hits {
            pattern_used[hit] = true;
        }

        let size = fs::metadata(&candidate.path)
            .map_err(|e| {
                SwBuildError::io(
                    format!("reading metadata of {}", candidate.path.display()),
                    e,
                )
            })?
            .len();

        if size > config.maximum_file_size_to_cache_in_bytes {
            outcome.warnings.push(format!(
                "{} is {} bytes, and won't be precached. Configure maximum_file_size_to_cache_in_bytes to change this limit.",
                candidate.relative, size
            ));
            continue;
        }

        let contents = read_file(&candidate.path)?;
        let mut entry = ManifestEntry::new(candidate.relative.clone())
            .with_revision(revision_of(&contents))
            .with_size(size);
        if config.integrity {
            entry = entry.with_integrity(integrity_of(&contents));
        }

        outcome.size += size;
        outcome.entries.push(entry);
    }

    for (pattern, used) in config.glob_patterns.iter().zip(&pattern_used) {
        if !used {
            outcome.warnings.push(format!(
                "The glob pattern {:?} didn't match any files. Check glob_directory and glob_patterns.",
                pattern
            ));
        }
    }

    for (url, source) in &config.templated_urls {
        let (revision, size) = templated_revision(url, source, &candidates)?;
        outcome
            .entries
            .push(
                ManifestEntry::new(url.clone())
                    .with_revision(revision)
                    .with_size(size),
            );
        outcome.size += size;
    }

    debug!(
        "Scan produced {} entries ({} bytes)",
        outcome.entries.len(),
        outcome.size
    );
    Ok(outcome)
}

/// Build a glob set, naming the offending pattern on failure
pub fn build_globset(patterns: &[String]) -> SwBuildResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| SwBuildError::InvalidGlob {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| SwBuildError::InvalidGlob {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })
}

/// Revision string: first 32 hex chars of the SHA-256 of the contents
pub fn revision_of(contents: &[u8]) -> String {
    let digest = Sha256::digest(contents);
    hex::encode(&digest[..16])
}

/// Subresource integrity string using SHA-384
pub fn integrity_of(contents: &[u8]) -> String {
    format!("sha384-{}", STANDARD.encode(Sha384::digest(contents)))
}

/// `/`-separated path of `path` relative to `root`
pub fn relative_url(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn collect_candidates(root: &Path, ignore: &GlobSet) -> SwBuildResult<Vec<Candidate>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            SwBuildError::io(format!("walking {}", root.display()), std::io::Error::from(e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(relative) = relative_url(root, entry.path()) else {
            continue;
        };
        if ignore.is_match(&relative) {
            continue;
        }

        candidates.push(Candidate {
            relative,
            path: entry.into_path(),
        });
    }

    candidates.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(candidates)
}

fn templated_revision(
    url: &str,
    source: &TemplatedSource,
    candidates: &[Candidate],
) -> SwBuildResult<(String, u64)> {
    match source {
        TemplatedSource::Content(content) => {
            Ok((revision_of(content.as_bytes()), content.len() as u64))
        }
        TemplatedSource::Globs(patterns) => {
            let set = build_globset(patterns)?;
            let mut hasher = Sha256::new();
            let mut size = 0;
            let mut matched = 0;

            for candidate in candidates.iter().filter(|c| set.is_match(&c.relative)) {
                let contents = read_file(&candidate.path)?;
                hasher.update(revision_of(&contents).as_bytes());
                size += contents.len() as u64;
                matched += 1;
            }

            if matched == 0 {
                return Err(SwBuildError::InvalidGlob {
                    pattern: patterns.join(", "),
                    reason: format!("templated URL {url} matched no files"),
                });
            }

            Ok((hex::encode(&hasher.finalize()[..16]), size))
        }
    }
}

fn read_file(path: &Path) -> SwBuildResult<Vec<u8>> {
    fs::read(path).map_err(|e| SwBuildError::io(format!("reading {}", path.display()), e))
}
