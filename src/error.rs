//! Error types for swbuild
//!
//! All modules use `SwBuildResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for swbuild operations
pub type SwBuildResult<T> = Result<T, SwBuildError>;

/// All errors that can occur in swbuild
#[derive(Error, Debug)]
pub enum SwBuildError {
    // Runtime caching configuration errors
    #[error("Unknown caching strategy: {0}")]
    UnknownStrategy(String),

    #[error("Runtime caching rule #{index} has no url pattern")]
    MissingUrlPattern { index: usize },

    #[error("Invalid url pattern {pattern:?}: {reason}")]
    InvalidUrlPattern { pattern: String, reason: String },

    #[error("Invalid HTTP method for runtime caching: {0}")]
    InvalidMethod(String),

    #[error("network_timeout_seconds is only supported by NetworkFirst, not {strategy}")]
    InvalidNetworkTimeout { strategy: String },

    #[error("Invalid {plugin} options: {reason}")]
    InvalidPluginOptions {
        plugin: &'static str,
        reason: String,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid glob pattern {pattern:?}: {reason}")]
    InvalidGlob { pattern: String, reason: String },

    // Manifest errors
    #[error("Manifest transform #{index} ({step}) failed: {source}")]
    TransformFailed {
        index: usize,
        step: String,
        #[source]
        source: Box<SwBuildError>,
    },

    #[error("{0}")]
    Transform(String),

    #[error("Invalid manifest entry: {0}")]
    InvalidManifestEntry(String),

    #[error("Injection point {point:?} not found in {path}")]
    InjectionPointMissing { point: String, path: PathBuf },

    #[error("Injection point {point:?} appears {count} times in {path}, expected exactly once")]
    InjectionPointAmbiguous {
        point: String,
        path: PathBuf,
        count: usize,
    },

    #[error("sw_src and sw_dest must be different files: {0}")]
    SameSrcAndDest(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl SwBuildError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an error for a failing manifest transform step
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform(message.into())
    }

    /// Check if the error belongs to the configuration family.
    ///
    /// These are raised while compiling rules or loading config, before any
    /// manifest is produced or request is routed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownStrategy(_)
                | Self::MissingUrlPattern { .. }
                | Self::InvalidUrlPattern { .. }
                | Self::InvalidMethod(_)
                | Self::InvalidNetworkTimeout { .. }
                | Self::InvalidPluginOptions { .. }
                | Self::ConfigInvalid { .. }
                | Self::InvalidGlob { .. }
        )
    }

    /// Check if error is retryable
    ///
    /// A failed transform aborts the build, but the caller may run the
    /// whole build again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransformFailed { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownStrategy(_) => Some(
                "Use one of: CacheFirst, CacheOnly, NetworkFirst, NetworkOnly, StaleWhileRevalidate",
            ),
            Self::MissingUrlPattern { .. } => {
                Some("Set url_pattern (exact match) or url_regex on the rule")
            }
            Self::InvalidMethod(_) => Some("Use one of: DELETE, GET, HEAD, PATCH, POST, PUT"),
            Self::InvalidNetworkTimeout { .. } => {
                Some("Remove network_timeout_seconds or switch the handler to NetworkFirst")
            }
            Self::InjectionPointMissing { .. } => {
                Some("Add `self.__WB_MANIFEST` to sw_src or change inject.injection_point")
            }
            Self::SameSrcAndDest(_) => Some("Point inject.sw_dest at a different file"),
            _ => None,
        }
    }
}
