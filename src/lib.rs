//! swbuild - service worker precache manifest builder
//!
//! Scans build output into a revisioned precache manifest, runs it through
//! an ordered chain of transform steps, injects it into a service worker,
//! and compiles runtime caching rules into a router.

pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod routing;
pub mod ui;

pub use error::{SwBuildError, SwBuildResult};
