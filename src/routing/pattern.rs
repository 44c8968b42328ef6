//! Request matching for runtime caching routes

use crate::error::{SwBuildError, SwBuildResult};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// The parts of a request a route can match on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method, e.g. "GET"
    pub method: String,

    /// Request URL as seen by the service worker
    pub url: String,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }

    /// Shorthand for a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }
}

/// Per-request predicate
pub type MatchCallback = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// How a rule decides whether it applies to a request
#[derive(Clone)]
pub enum UrlPattern {
    /// Exact string comparison with the request URL
    Exact(String),

    /// Regex tested against the request URL
    Regex(Regex),

    /// Arbitrary predicate invoked per request
    Predicate(MatchCallback),
}

impl UrlPattern {
    /// Exact-match pattern
    pub fn exact(url: impl Into<String>) -> Self {
        Self::Exact(url.into())
    }

    /// Compile a regex pattern
    pub fn regex(pattern: &str) -> SwBuildResult<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| SwBuildError::InvalidUrlPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Predicate pattern
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Check the pattern against a request
    pub fn matches(&self, request: &Request) -> bool {
        match self {
            Self::Exact(url) => *url == request.url,
            Self::Regex(re) => re.is_match(&request.url),
            Self::Predicate(f) => f(request),
        }
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(url) => write!(f, "{}", url),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
            Self::Predicate(_) => write!(f, "<predicate>"),
        }
    }
}

impl fmt::Debug for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(url) => f.debug_tuple("Exact").field(url).finish(),
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
