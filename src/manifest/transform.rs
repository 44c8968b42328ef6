//! Manifest transform chain
//!
//! A chain is an ordered list of steps folded over the manifest. Each step
//! receives the previous step's output and a shared, read-only build
//! context. Steps run one at a time in registration order; the first
//! failure aborts the remaining steps.

use crate::error::{SwBuildError, SwBuildResult};
use crate::manifest::entry::{ManifestEntry, ManifestTransformResult};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;

/// Read-only context handed to every transform step
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Directory the manifest was produced from
    pub glob_directory: PathBuf,
}

impl BuildContext {
    /// Create a context rooted at the given directory
    pub fn new(glob_directory: impl Into<PathBuf>) -> Self {
        Self {
            glob_directory: glob_directory.into(),
        }
    }
}

/// A single step in a manifest transform chain
///
/// Synchronous steps can be written with [`transform_fn`], asynchronous
/// closures with [`async_transform_fn`]. The chain awaits both the same way.
#[async_trait]
pub trait ManifestTransform<C: ?Sized + Sync = BuildContext>: Send + Sync {
    /// Name used in logs and in `TransformFailed` errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Rewrite the manifest
    async fn transform(
        &self,
        manifest: Vec<ManifestEntry>,
        context: &C,
    ) -> SwBuildResult<ManifestTransformResult>;
}

/// Transform step backed by a synchronous closure
pub struct FnTransform<F> {
    name: String,
    f: F,
}

/// Wrap a synchronous closure as a transform step
pub fn transform_fn<C, F>(name: impl Into<String>, f: F) -> FnTransform<F>
where
    C: ?Sized + Sync,
    F: Fn(Vec<ManifestEntry>, &C) -> SwBuildResult<ManifestTransformResult> + Send + Sync,
{
    FnTransform {
        name: name.into(),
        f,
    }
}

#[async_trait]
impl<C, F> ManifestTransform<C> for FnTransform<F>
where
    C: ?Sized + Sync,
    F: Fn(Vec<ManifestEntry>, &C) -> SwBuildResult<ManifestTransformResult> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(
        &self,
        manifest: Vec<ManifestEntry>,
        context: &C,
    ) -> SwBuildResult<ManifestTransformResult> {
        (self.f)(manifest, context)
    }
}

/// Transform step backed by a closure returning a future
///
/// The closure does not see the build context; implement
/// [`ManifestTransform`] directly when an asynchronous step needs it.
pub struct AsyncFnTransform<F> {
    name: String,
    f: F,
}

/// Wrap an asynchronous closure as a transform step
pub fn async_transform_fn<F, Fut>(name: impl Into<String>, f: F) -> AsyncFnTransform<F>
where
    F: Fn(Vec<ManifestEntry>) -> Fut + Send + Sync,
    Fut: Future<Output = SwBuildResult<ManifestTransformResult>> + Send + 'static,
{
    AsyncFnTransform {
        name: name.into(),
        f,
    }
}

#[async_trait]
impl<C, F, Fut> ManifestTransform<C> for AsyncFnTransform<F>
where
    C: ?Sized + Sync,
    F: Fn(Vec<ManifestEntry>) -> Fut + Send + Sync,
    Fut: Future<Output = SwBuildResult<ManifestTransformResult>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(
        &self,
        manifest: Vec<ManifestEntry>,
        _context: &C,
    ) -> SwBuildResult<ManifestTransformResult> {
        (self.f)(manifest).await
    }
}

/// Ordered list of transform steps
pub struct TransformChain<C: ?Sized + Sync = BuildContext> {
    steps: Vec<Box<dyn ManifestTransform<C>>>,
}

impl<C: ?Sized + Sync> TransformChain<C> {
    /// Create an empty chain
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step, builder style
    pub fn with_step(mut self, step: impl ManifestTransform<C> + 'static) -> Self {
        self.push(step);
        self
    }

    /// Append a step
    pub fn push(&mut self, step: impl ManifestTransform<C> + 'static) {
        self.steps.push(Box::new(step));
    }

    /// Insert steps ahead of every registered step, keeping their order
    pub fn prepend(&mut self, steps: Vec<Box<dyn ManifestTransform<C>>>) {
        self.steps.splice(0..0, steps);
    }

    /// Number of registered steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the registered steps, in order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Fold every step over the manifest.
    ///
    /// Warnings from all steps are concatenated in step order. If a step
    /// fails, later steps never run and the error names the failing step.
    pub async fn apply(
        &self,
        manifest: Vec<ManifestEntry>,
        context: &C,
    ) -> SwBuildResult<ManifestTransformResult> {
        let mut manifest = manifest;
        let mut warnings = Vec::new();

        for (index, step) in self.steps.iter().enumerate() {
            debug!(
                "Running manifest transform #{} ({}) on {} entries",
                index,
                step.name(),
                manifest.len()
            );

            let result = step.transform(manifest, context).await.map_err(|e| {
                SwBuildError::TransformFailed {
                    index,
                    step: step.name().to_string(),
                    source: Box::new(e),
                }
            })?;

            manifest = result.manifest;
            warnings.extend(result.warnings);
        }

        Ok(ManifestTransformResult { manifest, warnings })
    }
}

impl<C: ?Sized + Sync> Default for TransformChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized + Sync> fmt::Debug for TransformChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformChain")
            .field("steps", &self.step_names())
            .finish()
    }
}
