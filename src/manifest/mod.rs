//! Precache manifest generation
//!
//! The pipeline is:
//!
//! 1. [`producer::scan`] walks the glob directory and hashes files
//! 2. additional entries from config are appended
//! 3. the transform chain runs: built-in steps first, then caller steps
//! 4. the result is finalized (URL uniqueness, non-empty URLs)
//!
//! [`get_manifest`] returns the result; [`inject_manifest`] writes it into
//! a service worker file.

pub mod builtin;
pub mod entry;
pub mod inject;
pub mod producer;
pub mod transform;

pub use builtin::{DontCacheBust, ModifyUrlPrefix};
pub use entry::{ManifestEntry, ManifestTransformResult};
pub use inject::{inject_manifest, InjectManifestResult};
pub use transform::{
    async_transform_fn, transform_fn, AsyncFnTransform, BuildContext, FnTransform,
    ManifestTransform, TransformChain,
};

use crate::config::ManifestConfig;
use crate::error::{SwBuildError, SwBuildResult};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Output of [`get_manifest`]
#[derive(Debug, Clone, Serialize)]
pub struct GetManifestResult {
    pub manifest_entries: Vec<ManifestEntry>,
    pub count: usize,
    /// Total size in bytes of the files left in the final manifest
    pub size: u64,
    pub warnings: Vec<String>,
}

/// Produce the precache manifest for `config`, running `chain` after the
/// built-in transforms.
pub async fn get_manifest(
    config: &ManifestConfig,
    chain: TransformChain,
) -> SwBuildResult<GetManifestResult> {
    let scan_config = config.clone();
    let scan = tokio::task::spawn_blocking(move || producer::scan(&scan_config))
        .await
        .map_err(|e| SwBuildError::Internal(format!("file scan task failed: {e}")))??;

    let mut warnings = scan.warnings;
    let mut entries = scan.entries;

    for extra in &config.additional_manifest_entries {
        if extra.revision.is_none() {
            warnings.push(format!(
                "Additional manifest entry {} has no revision; make sure its URL is versioned.",
                extra.url
            ));
        }
        entries.push(extra.clone());
    }

    let mut chain = chain;
    chain.prepend(builtin_steps(config)?);
    debug!("Transform chain: {:?}", chain.step_names());

    let context = BuildContext::new(config.glob_directory.clone());
    let transformed = chain.apply(entries, &context).await?;
    warnings.extend(transformed.warnings);

    let manifest_entries = finalize(transformed.manifest, &mut warnings)?;
    let size: u64 = manifest_entries.iter().map(ManifestEntry::size).sum();

    info!(
        "Precache manifest has {} entries totaling {} bytes",
        manifest_entries.len(),
        size
    );

    Ok(GetManifestResult {
        count: manifest_entries.len(),
        size,
        manifest_entries,
        warnings,
    })
}

/// Built-in steps enabled by config, in the order they run
fn builtin_steps(config: &ManifestConfig) -> SwBuildResult<Vec<Box<dyn ManifestTransform>>> {
    let mut steps: Vec<Box<dyn ManifestTransform>> = Vec::new();

    if !config.modify_url_prefix.is_empty() {
        steps.push(Box::new(ModifyUrlPrefix::new(
            config.modify_url_prefix.clone(),
        )));
    }

    if let Some(ref pattern) = config.dont_cache_bust_urls_matching {
        steps.push(Box::new(DontCacheBust::new(pattern)?));
    }

    Ok(steps)
}

/// Enforce entry invariants on the chain's output.
///
/// Entries with an empty URL are rejected. When several entries share a
/// URL the last one wins and sits where the last occurrence was.
fn finalize(
    manifest: Vec<ManifestEntry>,
    warnings: &mut Vec<String>,
) -> SwBuildResult<Vec<ManifestEntry>> {
    if manifest.iter().any(|e| e.url.is_empty()) {
        return Err(SwBuildError::InvalidManifestEntry(
            "entry with an empty url".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut kept: Vec<ManifestEntry> = manifest
        .into_iter()
        .rev()
        .filter(|entry| {
            if seen.insert(entry.url.clone()) {
                true
            } else {
                duplicates.push(entry.url.clone());
                false
            }
        })
        .collect();
    kept.reverse();

    duplicates.sort();
    duplicates.dedup();
    for url in duplicates {
        warnings.push(format!(
            "Duplicate URL in manifest: {url} (keeping the last entry)"
        ));
    }

    Ok(kept)
}
