//! Recursion guard node

use crate::builder::{compose_single, BuildResult, BuilderNode, BuilderRef, SpecimenBuilder};
use crate::context::ResolutionContext;
use crate::recursion::comparer::{DefaultRequestComparer, RequestComparer};
use crate::recursion::handler::{RecursionHandler, ThrowingRecursionHandler};
use crate::recursion::stack::GuardId;
use crate::request::Request;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Occurrences of a request tolerated before the handler fires
///
/// One means a request resolves once normally and its second appearance on
/// the same path is treated as recursive.
pub const DEFAULT_RECURSION_DEPTH: NonZeroUsize = NonZeroUsize::MIN;

/// Wraps one builder and detects self-referential request cycles
///
/// # Algorithm
/// 1. Count occurrences of the request on this guard's stack for the current
///    call, using the configured comparer.
/// 2. If the count has reached the depth, hand the request and a stack
///    snapshot to the handler and return its answer without recursing.
/// 3. Otherwise push the request, delegate to the wrapped builder, and pop
///    on the way out (including on failure).
///
/// The stack lives in the call's [`ResolutionContext`], never on the guard,
/// so one guard can serve concurrent resolutions. Nested resolutions made by
/// the wrapped builder go through the same context and therefore the same
/// stack.
#[derive(Debug, Clone)]
pub struct RecursionGuard {
    id: GuardId,
    builder: BuilderRef,
    handler: Arc<dyn RecursionHandler>,
    comparer: Arc<dyn RequestComparer>,
    depth: NonZeroUsize,
}

impl RecursionGuard {
    /// Guard `builder` with the failing handler and default settings
    #[inline]
    #[must_use]
    pub fn new(builder: BuilderRef) -> Self {
        Self::with_handler(builder, Arc::new(ThrowingRecursionHandler))
    }

    /// Guard `builder` with `handler`
    #[inline]
    #[must_use]
    pub fn with_handler(builder: BuilderRef, handler: Arc<dyn RecursionHandler>) -> Self {
        Self {
            id: GuardId::new(),
            builder,
            handler,
            comparer: Arc::new(DefaultRequestComparer),
            depth: DEFAULT_RECURSION_DEPTH,
        }
    }

    /// Use `comparer` to decide request equality
    #[inline]
    #[must_use]
    pub fn comparer(mut self, comparer: Arc<dyn RequestComparer>) -> Self {
        self.comparer = comparer;
        self
    }

    /// Tolerate `depth` occurrences before handling
    #[inline]
    #[must_use]
    pub fn depth(mut self, depth: NonZeroUsize) -> Self {
        self.depth = depth;
        self
    }

    /// Wrapped builder
    #[inline]
    #[must_use]
    pub fn builder(&self) -> &BuilderRef {
        &self.builder
    }

    /// Configured handler
    #[inline]
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn RecursionHandler> {
        &self.handler
    }

    /// Configured depth
    #[inline]
    #[must_use]
    pub fn recursion_depth(&self) -> NonZeroUsize {
        self.depth
    }
}

impl SpecimenBuilder for RecursionGuard {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        let tracker = context.tracker();
        let seen = tracker.occurrences(self.id, request, self.comparer.as_ref());

        if seen >= self.depth.get() {
            tracing::debug!(
                request = %request,
                occurrences = seen,
                depth = self.depth.get(),
                "recursive request detected"
            );
            let stack = tracker.snapshot(self.id);
            return self.handler.handle(request, &stack);
        }

        let _frame = tracker.enter(self.id, request);
        self.builder.create(request, context)
    }

    fn as_node(&self) -> Option<&dyn BuilderNode> {
        Some(self)
    }
}

impl BuilderNode for RecursionGuard {
    fn children(&self) -> &[BuilderRef] {
        std::slice::from_ref(&self.builder)
    }

    fn compose(&self, children: Vec<BuilderRef>) -> BuilderRef {
        Arc::new(Self {
            id: GuardId::new(),
            builder: compose_single(children),
            handler: self.handler.clone(),
            comparer: self.comparer.clone(),
            depth: self.depth,
        })
    }
}
