//! Diagnostic request tracing

use crate::behavior::SpecimenBehavior;
use specimen_kernel::{
    compose_single, BuildResult, BuilderNode, BuilderRef, Outcome, Request, ResolutionContext,
    SpecimenBuilder,
};
use std::sync::Arc;

/// Opens a trace span around every request passing through
///
/// Nested resolutions re-enter the root, so spans nest the same way requests
/// do and span depth equals request depth.
#[derive(Debug, Clone)]
pub struct TracingBuilder {
    builder: BuilderRef,
}

impl TracingBuilder {
    /// Trace requests reaching `builder`
    #[inline]
    #[must_use]
    pub fn new(builder: BuilderRef) -> Self {
        Self { builder }
    }

    /// Traced builder
    #[inline]
    #[must_use]
    pub fn builder(&self) -> &BuilderRef {
        &self.builder
    }
}

impl SpecimenBuilder for TracingBuilder {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        let span = tracing::trace_span!("resolve", request = %request);
        let _entered = span.enter();

        let result = self.builder.create(request, context);
        match &result {
            Ok(Outcome::Created(value)) => tracing::trace!(?value, "created"),
            Ok(Outcome::NoSpecimen(_)) => tracing::trace!("declined"),
            Err(error) => tracing::trace!(%error, "failed"),
        }
        result
    }

    fn as_node(&self) -> Option<&dyn BuilderNode> {
        Some(self)
    }
}

impl BuilderNode for TracingBuilder {
    fn children(&self) -> &[BuilderRef] {
        std::slice::from_ref(&self.builder)
    }

    fn compose(&self, children: Vec<BuilderRef>) -> BuilderRef {
        Arc::new(Self::new(compose_single(children)))
    }
}

/// Wraps the pipeline in a [`TracingBuilder`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBehavior;

impl SpecimenBehavior for TracingBehavior {
    fn transform(&self, builder: BuilderRef) -> BuilderRef {
        Arc::new(TracingBuilder::new(builder))
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}
