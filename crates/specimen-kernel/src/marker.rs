//! Marker nodes
//!
//! A [`MarkerNode`] has no behaviour of its own: it dispatches over its
//! children like a composite. Its only job is to be found again after the
//! tree around it has been rebuilt, via [`MarkerNode::locator`].

use crate::builder::{BuildResult, BuilderNode, BuilderRef, SpecimenBuilder};
use crate::composite::dispatch;
use crate::context::ResolutionContext;
use crate::request::Request;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Tag identifying a marker inside a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerTag {
    /// User overrides, tried first
    Customizations,

    /// Built-in generators
    Engine,

    /// Fallback heuristics, tried after the engine
    ResidueCollectors,

    /// Application-defined bookmark
    Custom(&'static str),
}

impl Display for MarkerTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customizations => f.write_str("customizations"),
            Self::Engine => f.write_str("engine"),
            Self::ResidueCollectors => f.write_str("residue-collectors"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Pass-through node used as a bookmark
#[derive(Debug, Clone)]
pub struct MarkerNode {
    tag: MarkerTag,
    children: Vec<BuilderRef>,
}

impl MarkerNode {
    /// Create marker
    #[inline]
    #[must_use]
    pub fn new(tag: MarkerTag, children: Vec<BuilderRef>) -> Self {
        Self { tag, children }
    }

    /// Create marker with no children
    #[inline]
    #[must_use]
    pub fn empty(tag: MarkerTag) -> Self {
        Self::new(tag, Vec::new())
    }

    /// Tag
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &MarkerTag {
        &self.tag
    }

    /// Check whether `builder` is a marker tagged `tag`
    #[must_use]
    pub fn is_tagged(builder: &dyn SpecimenBuilder, tag: &MarkerTag) -> bool {
        builder
            .downcast_ref::<MarkerNode>()
            .is_some_and(|marker| &marker.tag == tag)
    }

    /// Predicate matching markers tagged `tag`
    #[must_use]
    pub fn locator(tag: MarkerTag) -> impl Fn(&dyn SpecimenBuilder) -> bool + Send + Sync + 'static {
        move |builder| Self::is_tagged(builder, &tag)
    }
}

impl SpecimenBuilder for MarkerNode {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        dispatch(&self.children, request, context)
    }

    fn as_node(&self) -> Option<&dyn BuilderNode> {
        Some(self)
    }
}

impl BuilderNode for MarkerNode {
    fn children(&self) -> &[BuilderRef] {
        &self.children
    }

    fn compose(&self, children: Vec<BuilderRef>) -> BuilderRef {
        Arc::new(Self::new(self.tag.clone(), children))
    }
}
