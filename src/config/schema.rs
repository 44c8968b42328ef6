//! Configuration schema for swbuild
//!
//! Configuration is read from `swbuild.toml`, found by walking up from the
//! current directory, or from the path given with `--config`.

use crate::manifest::ManifestEntry;
use crate::routing::RuntimeCachingOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default size limit for precached files (2 MiB)
pub const DEFAULT_MAXIMUM_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// Default placeholder replaced by `inject_manifest`
pub const DEFAULT_INJECTION_POINT: &str = "self.__WB_MANIFEST";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Precache manifest settings
    pub manifest: ManifestConfig,

    /// Manifest injection settings
    pub inject: InjectConfig,

    /// Runtime caching rules, in precedence order
    pub runtime_caching: Vec<RuntimeCachingConfig>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Precache manifest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Directory that is scanned for files
    pub glob_directory: PathBuf,

    /// Files to include, relative to `glob_directory`
    pub glob_patterns: Vec<String>,

    /// Files to exclude, relative to `glob_directory`
    pub glob_ignores: Vec<String>,

    /// Files above this size are skipped with a warning
    pub maximum_file_size_to_cache_in_bytes: u64,

    /// URLs matching this regex are already versioned and get no revision
    pub dont_cache_bust_urls_matching: Option<String>,

    /// URL prefix replacements applied to every entry
    pub modify_url_prefix: BTreeMap<String, String>,

    /// Compute a sha384 subresource integrity string per file
    pub integrity: bool,

    /// URLs whose revision is derived from other files or fixed content
    pub templated_urls: BTreeMap<String, TemplatedSource>,

    /// Entries appended after discovered files
    pub additional_manifest_entries: Vec<ManifestEntry>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            glob_directory: PathBuf::from("."),
            glob_patterns: vec!["**/*.{js,css,html}".to_string()],
            glob_ignores: vec!["**/node_modules/**/*".to_string()],
            maximum_file_size_to_cache_in_bytes: DEFAULT_MAXIMUM_FILE_SIZE,
            dont_cache_bust_urls_matching: None,
            modify_url_prefix: BTreeMap::new(),
            integrity: false,
            templated_urls: BTreeMap::new(),
            additional_manifest_entries: Vec::new(),
        }
    }
}

/// What a templated URL's revision is computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplatedSource {
    /// Glob patterns; the revision covers every matched file
    Globs(Vec<String>),

    /// Literal content, hashed as-is
    Content(String),
}

/// Manifest injection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectConfig {
    /// Service worker source containing the injection point
    pub sw_src: PathBuf,

    /// Where the service worker with the injected manifest is written
    pub sw_dest: PathBuf,

    /// Placeholder string replaced by the manifest JSON
    pub injection_point: String,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            sw_src: PathBuf::from("src/sw.js"),
            sw_dest: PathBuf::from("dist/sw.js"),
            injection_point: DEFAULT_INJECTION_POINT.to_string(),
        }
    }
}

/// One `[[runtime_caching]]` rule as written in TOML
///
/// Exactly one of `url_pattern` (exact match) or `url_regex` must be set.
/// Predicate patterns and custom handlers are only available through the
/// library API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeCachingConfig {
    /// Exact URL to match
    pub url_pattern: Option<String>,

    /// Regular expression tested against the request URL
    pub url_regex: Option<String>,

    /// Strategy name, e.g. "NetworkFirst"
    pub handler: String,

    /// HTTP method (default: GET)
    pub method: Option<String>,

    /// Strategy and plugin options
    pub options: Option<RuntimeCachingOptions>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[manifest]"));
        assert!(toml.contains("[inject]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.manifest.glob_patterns, vec!["**/*.{js,css,html}"]);
        assert_eq!(
            config.manifest.maximum_file_size_to_cache_in_bytes,
            DEFAULT_MAXIMUM_FILE_SIZE
        );
        assert_eq!(config.inject.injection_point, "self.__WB_MANIFEST");
        assert!(config.runtime_caching.is_empty());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [manifest]
            glob_directory = "build"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.manifest.glob_directory, PathBuf::from("build"));
        assert_eq!(config.manifest.glob_ignores, vec!["**/node_modules/**/*"]); // default preserved
    }

    #[test]
    fn runtime_caching_rules_deserialize() {
        let toml = r#"
            [[runtime_caching]]
            url_regex = "^/api/"
            handler = "NetworkFirst"

            [runtime_caching.options]
            cache_name = "api"
            network_timeout_seconds = 3

            [runtime_caching.options.expiration]
            max_entries = 50

            [[runtime_caching]]
            url_pattern = "/logo.png"
            handler = "CacheFirst"
            method = "get"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.runtime_caching.len(), 2);

        let api = &config.runtime_caching[0];
        assert_eq!(api.url_regex.as_deref(), Some("^/api/"));
        let options = api.options.as_ref().unwrap();
        assert_eq!(options.cache_name.as_deref(), Some("api"));
        assert_eq!(options.network_timeout_seconds, Some(3));
        assert_eq!(options.expiration.as_ref().unwrap().max_entries, Some(50));
        assert!(options.background_sync.is_none());

        assert_eq!(config.runtime_caching[1].method.as_deref(), Some("get"));
        assert!(config.runtime_caching[1].options.is_none());
    }

    #[test]
    fn templated_urls_accept_globs_or_content() {
        let toml = r#"
            [manifest.templated_urls]
            "/shell" = ["shell.html", "shell.css"]
            "/version" = "v42"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.manifest.templated_urls["/shell"],
            TemplatedSource::Globs(vec!["shell.html".to_string(), "shell.css".to_string()])
        );
        assert_eq!(
            config.manifest.templated_urls["/version"],
            TemplatedSource::Content("v42".to_string())
        );
    }

    #[test]
    fn additional_entries_deserialize() {
        let toml = r#"
            [[manifest.additional_manifest_entries]]
            url = "/offline.html"
            revision = "3"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.manifest.additional_manifest_entries,
            vec![ManifestEntry::new("/offline.html").with_revision("3")]
        );
    }
}
