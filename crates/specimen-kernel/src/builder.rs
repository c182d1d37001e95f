//! Builder and node contracts
//!
//! Provides [`SpecimenBuilder`], the single capability every pipeline stage
//! implements, and [`BuilderNode`], the extra capability of builders that own
//! children and can be rebuilt from a replacement child set.

use crate::context::ResolutionContext;
use crate::error::ResolutionError;
use crate::request::Request;
use crate::value::Outcome;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Shared handle to a builder
pub type BuilderRef = Arc<dyn SpecimenBuilder>;

/// Result of asking a builder for a specimen
pub type BuildResult = Result<Outcome, ResolutionError>;

/// Runtime type access for builders
///
/// Blanket-implemented for every `'static` type, which lets locator predicates
/// downcast a `&dyn SpecimenBuilder` without each builder opting in.
pub trait AsAny {
    /// View as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Concrete type name
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Unit that turns a request into an [`Outcome`]
///
/// # Contract
/// - Return [`Outcome::NoSpecimen`] for requests the builder does not
///   recognise; never fail for them.
/// - Fail only for recognised requests that cannot be satisfied.
/// - Never assume exclusive ownership of a request: several builders may see
///   the same request in one resolution.
/// - Resolve sub-requests through `context`, never by calling sibling
///   builders directly, so recursion guarding sees every nested request.
pub trait SpecimenBuilder: AsAny + Send + Sync + Debug {
    /// Produce a specimen for `request`, or decline it
    ///
    /// # Errors
    /// Returns `ResolutionError` when the request is recognised but cannot be
    /// satisfied, or when a nested resolution fails.
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult;

    /// Node capability, if this builder has children
    fn as_node(&self) -> Option<&dyn BuilderNode> {
        None
    }
}

impl<'a> dyn SpecimenBuilder + 'a {
    /// Downcast to a concrete builder
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Check concrete builder type
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Children, empty for leaf builders
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[BuilderRef] {
        match self.as_node() {
            Some(node) => node.children(),
            None => &[],
        }
    }
}

/// A builder that exposes its ordered children
///
/// Nodes are immutable values: the only way to "edit" one is
/// [`BuilderNode::compose`], which returns a new node of the same kind and
/// non-child configuration holding the given children.
pub trait BuilderNode {
    /// Ordered child builders
    fn children(&self) -> &[BuilderRef];

    /// Rebuild with `children`, keeping every other setting
    fn compose(&self, children: Vec<BuilderRef>) -> BuilderRef;
}

/// Collapse a child list into a single builder
///
/// Wrapping nodes that decorate exactly one builder use this in
/// [`BuilderNode::compose`]: one child is used as-is, any other count is
/// wrapped in a [`crate::CompositeBuilder`].
#[must_use]
pub fn compose_single(mut children: Vec<BuilderRef>) -> BuilderRef {
    if children.len() == 1 {
        children.remove(0)
    } else {
        Arc::new(crate::composite::CompositeBuilder::new(children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::CompositeBuilder;
    use crate::fixed::FixedBuilder;
    use crate::value::Value;

    #[test]
    fn downcast_through_trait_object() {
        let builder: BuilderRef = Arc::new(FixedBuilder::new(Value::Int(1)));
        assert!(builder.is::<FixedBuilder>());
        assert!(!builder.is::<CompositeBuilder>());
        assert!(builder.downcast_ref::<FixedBuilder>().is_some());
    }

    #[test]
    fn leaf_has_no_children() {
        let builder: BuilderRef = Arc::new(FixedBuilder::new(Value::Null));
        assert!(builder.as_node().is_none());
        assert!(builder.children().is_empty());
    }

    #[test]
    fn type_name_reports_concrete_type() {
        let builder: BuilderRef = Arc::new(FixedBuilder::new(Value::Null));
        assert!(builder.as_ref().type_name().ends_with("FixedBuilder"));
    }

    #[test]
    fn compose_single_unwraps_one_child() {
        let only: BuilderRef = Arc::new(FixedBuilder::new(Value::Null));
        let composed = compose_single(vec![only.clone()]);
        assert!(Arc::ptr_eq(&only, &composed));

        let composed = compose_single(vec![only.clone(), only]);
        assert!(composed.is::<CompositeBuilder>());
    }
}
