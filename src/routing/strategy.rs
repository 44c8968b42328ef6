//! Named caching strategies and their plugin shortcuts

use crate::error::{SwBuildError, SwBuildResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Built-in caching strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyName {
    CacheFirst,
    CacheOnly,
    NetworkFirst,
    NetworkOnly,
    StaleWhileRevalidate,
}

impl StrategyName {
    /// All strategies, in the order shown to users
    pub fn all() -> &'static [Self] {
        &[
            Self::CacheFirst,
            Self::CacheOnly,
            Self::NetworkFirst,
            Self::NetworkOnly,
            Self::StaleWhileRevalidate,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CacheFirst => "CacheFirst",
            Self::CacheOnly => "CacheOnly",
            Self::NetworkFirst => "NetworkFirst",
            Self::NetworkOnly => "NetworkOnly",
            Self::StaleWhileRevalidate => "StaleWhileRevalidate",
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyName {
    type Err = SwBuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SwBuildError::UnknownStrategy(s.to_string()))
    }
}

/// Options for the background sync plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSyncOptions {
    /// Queue name
    pub name: Option<String>,

    /// Extra options passed to the plugin
    pub options: Option<serde_json::Value>,
}

/// Options for the broadcast update plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastUpdateOptions {
    /// Broadcast channel name
    pub channel_name: Option<String>,

    /// Extra options passed to the plugin
    pub options: Option<serde_json::Value>,
}

/// Options for the cacheable response plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheableResponseOptions {
    /// Headers that must be present with the given values
    pub headers: Option<BTreeMap<String, String>>,

    /// Status codes that may be cached
    pub statuses: Option<Vec<u16>>,
}

/// Options for the expiration plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpirationOptions {
    /// Maximum age of a cached response
    pub max_age_seconds: Option<u64>,

    /// Maximum number of cached responses
    pub max_entries: Option<u32>,
}

/// Per-rule strategy configuration and plugin shortcuts
///
/// Each shortcut is independently optional. `None` means the plugin is not
/// attached at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeCachingOptions {
    pub background_sync: Option<BackgroundSyncOptions>,
    pub broadcast_update: Option<BroadcastUpdateOptions>,
    pub cacheable_response: Option<CacheableResponseOptions>,
    pub cache_name: Option<String>,
    pub fetch_options: Option<serde_json::Value>,
    pub expiration: Option<ExpirationOptions>,
    pub match_options: Option<serde_json::Value>,
    /// Only valid with NetworkFirst
    pub network_timeout_seconds: Option<u32>,
    /// Additional plugins, attached verbatim after the shortcuts
    pub plugins: Vec<serde_json::Value>,
}

/// A plugin attached to a strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "plugin", content = "config", rename_all = "snake_case")]
pub enum Plugin {
    BackgroundSync(BackgroundSyncOptions),
    BroadcastUpdate(BroadcastUpdateOptions),
    CacheableResponse(CacheableResponseOptions),
    Expiration(ExpirationOptions),
    Custom(serde_json::Value),
}

impl Plugin {
    /// Short name of the plugin kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BackgroundSync(_) => "background_sync",
            Self::BroadcastUpdate(_) => "broadcast_update",
            Self::CacheableResponse(_) => "cacheable_response",
            Self::Expiration(_) => "expiration",
            Self::Custom(_) => "custom",
        }
    }
}

/// A configured strategy instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    pub name: StrategyName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_options: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_options: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_timeout_seconds: Option<u32>,
    pub plugins: Vec<Plugin>,
}

impl Strategy {
    /// Build a strategy with no options
    pub fn new(name: StrategyName) -> Self {
        Self {
            name,
            cache_name: None,
            fetch_options: None,
            match_options: None,
            network_timeout_seconds: None,
            plugins: Vec::new(),
        }
    }

    /// Build a strategy from rule options.
    ///
    /// Plugins are attached in a fixed order: background sync, broadcast
    /// update, cacheable response, expiration, then `plugins` verbatim.
    pub fn from_options(name: StrategyName, options: &RuntimeCachingOptions) -> SwBuildResult<Self> {
        if options.network_timeout_seconds.is_some() && name != StrategyName::NetworkFirst {
            return Err(SwBuildError::InvalidNetworkTimeout {
                strategy: name.to_string(),
            });
        }

        let mut plugins = Vec::new();

        if let Some(ref sync) = options.background_sync {
            plugins.push(Plugin::BackgroundSync(sync.clone()));
        }

        if let Some(ref broadcast) = options.broadcast_update {
            plugins.push(Plugin::BroadcastUpdate(broadcast.clone()));
        }

        if let Some(ref cacheable) = options.cacheable_response {
            if cacheable.statuses.is_none() && cacheable.headers.is_none() {
                return Err(SwBuildError::InvalidPluginOptions {
                    plugin: "cacheable_response",
                    reason: "set statuses, headers, or both".to_string(),
                });
            }
            plugins.push(Plugin::CacheableResponse(cacheable.clone()));
        }

        if let Some(ref expiration) = options.expiration {
            if expiration.max_entries.is_none() && expiration.max_age_seconds.is_none() {
                return Err(SwBuildError::InvalidPluginOptions {
                    plugin: "expiration",
                    reason: "set max_entries, max_age_seconds, or both".to_string(),
                });
            }
            plugins.push(Plugin::Expiration(expiration.clone()));
        }

        plugins.extend(options.plugins.iter().cloned().map(Plugin::Custom));

        Ok(Self {
            name,
            cache_name: options.cache_name.clone(),
            fetch_options: options.fetch_options.clone(),
            match_options: options.match_options.clone(),
            network_timeout_seconds: options.network_timeout_seconds,
            plugins,
        })
    }

    /// Whether a plugin of the given kind is attached
    pub fn has_plugin(&self, kind: &str) -> bool {
        self.plugins.iter().any(|p| p.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_names() {
        for name in StrategyName::all() {
            assert_eq!(name.as_str().parse::<StrategyName>().unwrap(), *name);
        }
    }

    #[test]
    fn unknown_name_errors() {
        let err = "cacheFirst".parse::<StrategyName>().unwrap_err();
        assert!(matches!(err, SwBuildError::UnknownStrategy(ref s) if s == "cacheFirst"));
    }

    #[test]
    fn no_options_means_no_plugins() {
        let strategy =
            Strategy::from_options(StrategyName::CacheFirst, &RuntimeCachingOptions::default())
                .unwrap();
        assert_eq!(strategy, Strategy::new(StrategyName::CacheFirst));
    }

    #[test]
    fn plugins_attach_in_fixed_order() {
        let options = RuntimeCachingOptions {
            expiration: Some(ExpirationOptions {
                max_entries: Some(10),
                max_age_seconds: None,
            }),
            background_sync: Some(BackgroundSyncOptions {
                name: Some("queue".to_string()),
                options: None,
            }),
            cacheable_response: Some(CacheableResponseOptions {
                statuses: Some(vec![0, 200]),
                headers: None,
            }),
            plugins: vec![json!({"name": "custom"})],
            ..Default::default()
        };

        let strategy = Strategy::from_options(StrategyName::StaleWhileRevalidate, &options).unwrap();
        let kinds: Vec<&str> = strategy.plugins.iter().map(|p| p.kind()).collect();
        assert_eq!(
            kinds,
            vec!["background_sync", "cacheable_response", "expiration", "custom"]
        );
    }

    #[test]
    fn network_timeout_requires_network_first() {
        let options = RuntimeCachingOptions {
            network_timeout_seconds: Some(3),
            ..Default::default()
        };

        let strategy = Strategy::from_options(StrategyName::NetworkFirst, &options).unwrap();
        assert_eq!(strategy.network_timeout_seconds, Some(3));

        let err = Strategy::from_options(StrategyName::CacheFirst, &options).unwrap_err();
        assert!(matches!(err, SwBuildError::InvalidNetworkTimeout { .. }));
    }

    #[test]
    fn empty_expiration_is_rejected() {
        let options = RuntimeCachingOptions {
            expiration: Some(ExpirationOptions::default()),
            ..Default::default()
        };
        let err = Strategy::from_options(StrategyName::CacheFirst, &options).unwrap_err();
        assert!(matches!(
            err,
            SwBuildError::InvalidPluginOptions {
                plugin: "expiration",
                ..
            }
        ));
    }

    #[test]
    fn strategy_serializes_plugins_tagged() {
        let options = RuntimeCachingOptions {
            cache_name: Some("images".to_string()),
            expiration: Some(ExpirationOptions {
                max_entries: Some(60),
                max_age_seconds: Some(86400),
            }),
            ..Default::default()
        };
        let strategy = Strategy::from_options(StrategyName::CacheFirst, &options).unwrap();
        let value = serde_json::to_value(&strategy).unwrap();

        assert_eq!(value["name"], "CacheFirst");
        assert_eq!(value["cache_name"], "images");
        assert_eq!(value["plugins"][0]["plugin"], "expiration");
        assert_eq!(value["plugins"][0]["config"]["max_entries"], 60);
        assert!(value.get("network_timeout_seconds").is_none());
    }
}
