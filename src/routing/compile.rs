//! Runtime caching rule compiler
//!
//! Turns declarative [`RuntimeCachingEntry`] rules into a [`Router`]. Rules
//! are compiled independently and keep their registration order, which is
//! also their precedence: the first route whose method and pattern match a
//! request handles it.

use crate::config::RuntimeCachingConfig;
use crate::error::{SwBuildError, SwBuildResult};
use crate::routing::pattern::{Request, UrlPattern};
use crate::routing::strategy::{RuntimeCachingOptions, Strategy, StrategyName};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// HTTP methods a rule may be registered for
const ALLOWED_METHODS: &[&str] = &["DELETE", "GET", "HEAD", "PATCH", "POST", "PUT"];

/// Response produced by a custom handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Caller-supplied response producer used instead of a named strategy
#[async_trait]
pub trait HandlerCallback: Send + Sync {
    async fn handle(&self, request: &Request) -> SwBuildResult<Response>;
}

/// What a rule uses to answer a request
#[derive(Clone)]
pub enum Handler {
    /// One of the built-in strategies
    Named(StrategyName),

    /// A custom callback. Plugin shortcuts do not apply.
    Custom(Arc<dyn HandlerCallback>),
}

impl Handler {
    /// Resolve a strategy name
    pub fn named(name: &str) -> SwBuildResult<Self> {
        name.parse().map(Self::Named)
    }

    pub fn custom(callback: impl HandlerCallback + 'static) -> Self {
        Self::Custom(Arc::new(callback))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One runtime caching rule
#[derive(Debug, Clone)]
pub struct RuntimeCachingEntry {
    pub handler: Handler,
    pub url_pattern: UrlPattern,
    /// Defaults to GET
    pub method: Option<String>,
    pub options: Option<RuntimeCachingOptions>,
}

impl RuntimeCachingEntry {
    pub fn new(url_pattern: UrlPattern, handler: Handler) -> Self {
        Self {
            handler,
            url_pattern,
            method: None,
            options: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_options(mut self, options: RuntimeCachingOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Build a rule from its TOML form. `index` is only used in errors.
    pub fn from_config(index: usize, config: &RuntimeCachingConfig) -> SwBuildResult<Self> {
        let url_pattern = match (&config.url_pattern, &config.url_regex) {
            (Some(exact), None) => UrlPattern::exact(exact.clone()),
            (None, Some(regex)) => UrlPattern::regex(regex)?,
            (None, None) => return Err(SwBuildError::MissingUrlPattern { index }),
            (Some(_), Some(_)) => {
                return Err(SwBuildError::InvalidUrlPattern {
                    pattern: format!("runtime_caching[{index}]"),
                    reason: "set either url_pattern or url_regex, not both".to_string(),
                })
            }
        };

        Ok(Self {
            handler: Handler::named(&config.handler)?,
            url_pattern,
            method: config.method.clone(),
            options: config.options.clone(),
        })
    }
}

/// How a compiled route answers requests
#[derive(Clone)]
pub enum RouteHandler {
    Strategy(Strategy),
    Custom(Arc<dyn HandlerCallback>),
}

impl RouteHandler {
    /// The strategy, if this route uses a named one
    pub fn strategy(&self) -> Option<&Strategy> {
        match self {
            Self::Strategy(s) => Some(s),
            Self::Custom(_) => None,
        }
    }
}

impl fmt::Debug for RouteHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strategy(s) => f.debug_tuple("Strategy").field(s).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A compiled rule
#[derive(Debug, Clone)]
pub struct Route {
    pub url_pattern: UrlPattern,
    pub method: String,
    pub handler: RouteHandler,
}

impl Route {
    /// Whether this route applies to the request
    pub fn matches(&self, request: &Request) -> bool {
        self.method.eq_ignore_ascii_case(&request.method) && self.url_pattern.matches(request)
    }
}

/// Printable description of a compiled route
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub index: usize,
    pub method: String,
    pub url_pattern: String,
    pub handler: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

/// First-match-wins collection of routes
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Find the route that handles a request
    pub fn route(&self, request: &Request) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(request))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Describe every route, in precedence order
    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes
            .iter()
            .enumerate()
            .map(|(index, route)| RouteSummary {
                index,
                method: route.method.clone(),
                url_pattern: route.url_pattern.to_string(),
                handler: match &route.handler {
                    RouteHandler::Strategy(s) => s.name.to_string(),
                    RouteHandler::Custom(_) => "custom".to_string(),
                },
                strategy: route.handler.strategy().cloned(),
            })
            .collect()
    }
}

/// Compile rules into a router.
///
/// Fails on the first invalid rule so configuration problems surface
/// before anything is served.
pub fn compile(entries: &[RuntimeCachingEntry]) -> SwBuildResult<Router> {
    let routes = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| compile_entry(index, entry))
        .collect::<SwBuildResult<Vec<_>>>()?;

    debug!("Compiled {} runtime caching routes", routes.len());
    Ok(Router { routes })
}

/// Compile the `[[runtime_caching]]` tables of a config file
pub fn compile_config(rules: &[RuntimeCachingConfig]) -> SwBuildResult<Router> {
    let entries = rules
        .iter()
        .enumerate()
        .map(|(index, rule)| RuntimeCachingEntry::from_config(index, rule))
        .collect::<SwBuildResult<Vec<_>>>()?;
    compile(&entries)
}

fn compile_entry(index: usize, entry: &RuntimeCachingEntry) -> SwBuildResult<Route> {
    let method = normalize_method(entry.method.as_deref())?;

    let handler = match &entry.handler {
        Handler::Named(name) => {
            let strategy = match &entry.options {
                Some(options) => Strategy::from_options(*name, options)?,
                None => Strategy::new(*name),
            };
            RouteHandler::Strategy(strategy)
        }
        Handler::Custom(callback) => {
            if entry.options.is_some() {
                debug!(
                    "Runtime caching rule #{} uses a custom handler; ignoring its options",
                    index
                );
            }
            RouteHandler::Custom(Arc::clone(callback))
        }
    };

    Ok(Route {
        url_pattern: entry.url_pattern.clone(),
        method,
        handler,
    })
}

fn normalize_method(method: Option<&str>) -> SwBuildResult<String> {
    let method = method.unwrap_or("GET").to_ascii_uppercase();
    if ALLOWED_METHODS.contains(&method.as_str()) {
        Ok(method)
    } else {
        Err(SwBuildError::InvalidMethod(method))
    }
}
