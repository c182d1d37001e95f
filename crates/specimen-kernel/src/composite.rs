//! First-match-wins composite builder

use crate::builder::{BuildResult, BuilderNode, BuilderRef, SpecimenBuilder};
use crate::context::ResolutionContext;
use crate::request::Request;
use crate::value::Outcome;
use std::sync::Arc;

/// Ordered aggregation of child builders
///
/// # Dispatch
/// Children are asked in order; the first one that produces a specimen (or
/// fails) ends the dispatch and later children are never invoked. When every
/// child declines, the composite declines too. Registration order is
/// therefore override precedence.
#[derive(Debug, Clone, Default)]
pub struct CompositeBuilder {
    children: Vec<BuilderRef>,
}

impl CompositeBuilder {
    /// Create composite over `children`
    #[inline]
    #[must_use]
    pub fn new(children: Vec<BuilderRef>) -> Self {
        Self { children }
    }

    /// Create composite from any builder sequence
    #[must_use]
    pub fn from_builders<I>(builders: I) -> Self
    where
        I: IntoIterator<Item = BuilderRef>,
    {
        Self {
            children: builders.into_iter().collect(),
        }
    }

    /// Number of children
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if there are no children
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Ask `children` in order, returning the first non-sentinel answer
///
/// Shared by every node whose own behaviour is plain dispatch.
///
/// # Errors
/// Returns the first failure raised by a child.
pub fn dispatch(
    children: &[BuilderRef],
    request: &Request,
    context: &dyn ResolutionContext,
) -> BuildResult {
    for child in children {
        let outcome = child.create(request, context)?;
        if outcome.is_created() {
            return Ok(outcome);
        }
    }
    Ok(Outcome::declined(request))
}

impl SpecimenBuilder for CompositeBuilder {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        dispatch(&self.children, request, context)
    }

    fn as_node(&self) -> Option<&dyn BuilderNode> {
        Some(self)
    }
}

impl BuilderNode for CompositeBuilder {
    fn children(&self) -> &[BuilderRef] {
        &self.children
    }

    fn compose(&self, children: Vec<BuilderRef>) -> BuilderRef {
        Arc::new(Self::new(children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::resolve;
    use crate::error::ResolutionError;
    use crate::fixed::{FactoryBuilder, FixedBuilder};
    use crate::value::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn declining() -> BuilderRef {
        Arc::new(FactoryBuilder::new(|req, _| Ok(Outcome::declined(req))))
    }

    fn counting(hits: Arc<AtomicUsize>) -> BuilderRef {
        Arc::new(FactoryBuilder::new(move |req, _| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(Outcome::declined(req))
        }))
    }

    #[test]
    fn first_match_wins() {
        let later = Arc::new(AtomicUsize::new(0));
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![
            declining(),
            Arc::new(FixedBuilder::new(Value::Int(1))),
            Arc::new(FixedBuilder::new(Value::Int(2))),
            counting(later.clone()),
        ]));

        let outcome = resolve(&root, &Request::type_named("T")).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Int(1)));
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn all_declining_declines() {
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![declining(), declining()]));
        let outcome = resolve(&root, &Request::type_named("T")).unwrap();
        assert!(outcome.is_no_specimen());
    }

    #[test]
    fn empty_composite_declines() {
        let root: BuilderRef = Arc::new(CompositeBuilder::default());
        let outcome = resolve(&root, &Request::type_named("T")).unwrap();
        assert!(outcome.is_no_specimen());
    }

    #[test]
    fn null_value_wins_dispatch() {
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![
            Arc::new(FixedBuilder::new(Value::Null)),
            Arc::new(FixedBuilder::new(Value::Int(2))),
        ]));
        let outcome = resolve(&root, &Request::type_named("T")).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Null));
    }

    #[test]
    fn failure_stops_dispatch() {
        let later = Arc::new(AtomicUsize::new(0));
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![
            Arc::new(FactoryBuilder::new(|req, _| {
                Err(ResolutionError::builder(req, "malformed"))
            })),
            counting(later.clone()),
        ]));
        assert!(resolve(&root, &Request::type_named("T")).is_err());
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn compose_keeps_kind() {
        let node = CompositeBuilder::new(vec![declining()]);
        let rebuilt = node.compose(vec![declining(), declining()]);
        assert!(rebuilt.is::<CompositeBuilder>());
        assert_eq!(rebuilt.children().len(), 2);
    }
}
