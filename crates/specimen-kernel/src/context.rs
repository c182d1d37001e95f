//! Resolution context
//!
//! A [`ResolutionContext`] is what a builder uses to resolve sub-requests
//! against the whole pipeline rather than just itself. One context lives for
//! exactly one top-level resolution and carries that call's request stacks.

use crate::builder::{BuildResult, BuilderRef};
use crate::recursion::RequestTracker;
use crate::request::Request;

/// Capability to resolve nested requests
pub trait ResolutionContext {
    /// Resolve `request` against the root of the pipeline
    ///
    /// # Errors
    /// Propagates any failure raised while resolving.
    fn resolve(&self, request: &Request) -> BuildResult;

    /// Per-call recursion bookkeeping
    fn tracker(&self) -> &RequestTracker;
}

/// Context for one top-level resolution
///
/// Not shared between calls: create a fresh one for every outer request so
/// concurrent resolutions over the same pipeline never see each other's
/// request stacks.
#[derive(Debug)]
pub struct SpecimenContext {
    builder: BuilderRef,
    tracker: RequestTracker,
}

impl SpecimenContext {
    /// Create context resolving against `builder`
    #[inline]
    #[must_use]
    pub fn new(builder: BuilderRef) -> Self {
        Self {
            builder,
            tracker: RequestTracker::new(),
        }
    }

    /// Root builder
    #[inline]
    #[must_use]
    pub fn builder(&self) -> &BuilderRef {
        &self.builder
    }
}

impl ResolutionContext for SpecimenContext {
    fn resolve(&self, request: &Request) -> BuildResult {
        self.builder.create(request, self)
    }

    fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }
}

/// Resolve one request in a fresh context
///
/// # Errors
/// Propagates any failure raised while resolving.
pub fn resolve(builder: &BuilderRef, request: &Request) -> BuildResult {
    SpecimenContext::new(builder.clone()).resolve(request)
}
