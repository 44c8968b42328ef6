//! Runtime caching
//!
//! Runtime caching rules decide, at serve time, how requests that are not
//! in the precache manifest are answered. Each rule pairs a URL pattern and
//! HTTP method with either a named strategy (plus optional plugin
//! shortcuts) or a custom handler callback.
//!
//! | Pattern | Matches when |
//! |---------|--------------|
//! | `Exact` | request URL equals the string |
//! | `Regex` | regex finds a match in the request URL |
//! | `Predicate` | callback returns true |

pub mod compile;
pub mod pattern;
pub mod strategy;

pub use compile::{
    compile, compile_config, Handler, HandlerCallback, Response, Route, RouteHandler,
    RouteSummary, Router, RuntimeCachingEntry,
};
pub use pattern::{MatchCallback, Request, UrlPattern};
pub use strategy::{
    BackgroundSyncOptions, BroadcastUpdateOptions, CacheableResponseOptions, ExpirationOptions,
    Plugin, RuntimeCachingOptions, Strategy, StrategyName,
};
