//! Built-in transform steps
//!
//! These run ahead of any caller-supplied steps and are driven by the
//! `[manifest]` config table.

use crate::error::{SwBuildError, SwBuildResult};
use crate::manifest::entry::{ManifestEntry, ManifestTransformResult};
use crate::manifest::transform::ManifestTransform;
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;

/// Rewrites URL prefixes, e.g. `dist/` to `/static/`
#[derive(Debug, Clone)]
pub struct ModifyUrlPrefix {
    prefixes: BTreeMap<String, String>,
}

impl ModifyUrlPrefix {
    pub fn new(prefixes: BTreeMap<String, String>) -> Self {
        Self { prefixes }
    }

    /// Rewrite with the longest matching prefix. A URL is rewritten at
    /// most once.
    fn rewrite(&self, url: &str) -> String {
        self.prefixes
            .iter()
            .filter_map(|(prefix, replacement)| {
                url.strip_prefix(prefix.as_str())
                    .map(|rest| (prefix.len(), replacement, rest))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, replacement, rest)| format!("{replacement}{rest}"))
            .unwrap_or_else(|| url.to_string())
    }
}

#[async_trait]
impl<C: ?Sized + Sync> ManifestTransform<C> for ModifyUrlPrefix {
    fn name(&self) -> &str {
        "modify_url_prefix"
    }

    async fn transform(
        &self,
        manifest: Vec<ManifestEntry>,
        _context: &C,
    ) -> SwBuildResult<ManifestTransformResult> {
        let manifest = manifest
            .into_iter()
            .map(|mut entry| {
                entry.url = self.rewrite(&entry.url);
                entry
            })
            .collect();
        Ok(ManifestTransformResult::new(manifest))
    }
}

/// Drops the revision of entries whose URL already carries a content hash
#[derive(Debug, Clone)]
pub struct DontCacheBust {
    pattern: Regex,
}

impl DontCacheBust {
    pub fn new(pattern: &str) -> SwBuildResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| SwBuildError::InvalidUrlPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern })
    }
}

#[async_trait]
impl<C: ?Sized + Sync> ManifestTransform<C> for DontCacheBust {
    fn name(&self) -> &str {
        "dont_cache_bust_urls_matching"
    }

    async fn transform(
        &self,
        manifest: Vec<ManifestEntry>,
        _context: &C,
    ) -> SwBuildResult<ManifestTransformResult> {
        let manifest = manifest
            .into_iter()
            .map(|mut entry| {
                if self.pattern.is_match(&entry.url) {
                    entry.revision = None;
                }
                entry
            })
            .collect();
        Ok(ManifestTransformResult::new(manifest))
    }
}
