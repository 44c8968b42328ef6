//! Manifest entry types

use serde::{Deserialize, Serialize};

/// One cacheable asset in a precache manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// URL of the asset, relative to the service worker scope
    pub url: String,

    /// Content hash of the asset. Absent when the URL is itself
    /// content-addressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Subresource integrity metadata used when fetching the asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,

    /// Bytes this entry adds to the precache. Zero for entries that were
    /// not produced by the file scan.
    #[serde(skip)]
    size: u64,
}

impl ManifestEntry {
    /// Create an entry with no revision or integrity
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            revision: None,
            integrity: None,
            size: 0,
        }
    }

    /// Bytes this entry adds to the precache
    pub fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set the revision
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Set the integrity string
    pub fn with_integrity(mut self, integrity: impl Into<String>) -> Self {
        self.integrity = Some(integrity.into());
        self
    }
}

/// Output of one transform step, and of the whole chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestTransformResult {
    /// Entries after the transform
    pub manifest: Vec<ManifestEntry>,

    /// Warnings raised by the transform
    pub warnings: Vec<String>,
}

impl ManifestTransformResult {
    /// A result carrying the manifest and no warnings
    pub fn new(manifest: Vec<ManifestEntry>) -> Self {
        Self {
            manifest,
            warnings: Vec::new(),
        }
    }

    /// Append a warning
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}
