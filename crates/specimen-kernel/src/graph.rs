//! Builder graph utilities
//!
//! Graphs are immutable trees of [`BuilderRef`]. Nodes are addressed by
//! *paths*: the child indices leading from the root to the node, so the root
//! itself is the empty path. Editing rebuilds every ancestor on the path via
//! [`BuilderNode::compose`] and leaves all other subtrees shared.

use crate::builder::{BuilderNode, BuilderRef, SpecimenBuilder};
use crate::error::GraphError;
use std::sync::Arc;

/// Child indices from the root to a node
pub type NodePath = Vec<usize>;

/// Visit every builder depth-first, parents before children
pub fn walk<F>(root: &BuilderRef, mut visit: F)
where
    F: FnMut(&[usize], &BuilderRef),
{
    fn go<F>(node: &BuilderRef, path: &mut NodePath, visit: &mut F)
    where
        F: FnMut(&[usize], &BuilderRef),
    {
        visit(path.as_slice(), node);
        for (index, child) in node.children().iter().enumerate() {
            path.push(index);
            go(child, path, visit);
            path.pop();
        }
    }

    go(root, &mut Vec::new(), &mut visit);
}

/// Paths of every builder matching `predicate`, in walk order
#[must_use]
pub fn find_all<P>(root: &BuilderRef, predicate: &P) -> Vec<NodePath>
where
    P: Fn(&dyn SpecimenBuilder) -> bool + ?Sized,
{
    let mut found = Vec::new();
    walk(root, |path, node| {
        if predicate(node.as_ref()) {
            found.push(path.to_vec());
        }
    });
    found
}

/// Path of the single builder matching `predicate`
///
/// # Errors
/// Returns [`GraphError::NodeNotFound`] when nothing matches and
/// [`GraphError::AmbiguousNode`] when more than one builder matches.
pub fn locate<P>(root: &BuilderRef, predicate: &P) -> Result<NodePath, GraphError>
where
    P: Fn(&dyn SpecimenBuilder) -> bool + ?Sized,
{
    let mut found = find_all(root, predicate);
    match found.len() {
        0 => Err(GraphError::NodeNotFound),
        1 => Ok(found.remove(0)),
        matches => Err(GraphError::AmbiguousNode { matches }),
    }
}

/// Builder at `path`
///
/// # Errors
/// Returns [`GraphError::IndexOutOfRange`] when the path leaves the graph.
pub fn node_at(root: &BuilderRef, path: &[usize]) -> Result<BuilderRef, GraphError> {
    let mut current = root.clone();
    for &index in path {
        let next = child_at(&current, index)?;
        current = next;
    }
    Ok(current)
}

fn child_at(node: &BuilderRef, index: usize) -> Result<BuilderRef, GraphError> {
    let children = node.children();
    children
        .get(index)
        .cloned()
        .ok_or(GraphError::IndexOutOfRange {
            index,
            len: children.len(),
        })
}

/// Node capability of `builder`
///
/// # Errors
/// Returns [`GraphError::NotANode`] for leaf builders.
pub fn as_node(builder: &BuilderRef) -> Result<&dyn BuilderNode, GraphError> {
    builder.as_node().ok_or(GraphError::NotANode {
        kind: builder.as_ref().type_name(),
    })
}

/// Return a new graph with the builder at `path` swapped for `replacement`
///
/// Ancestors on the path are rebuilt with `compose`; siblings are shared with
/// the old graph, which stays untouched.
///
/// # Errors
/// Returns [`GraphError::IndexOutOfRange`] when the path leaves the graph.
pub fn replace(
    root: &BuilderRef,
    path: &[usize],
    replacement: BuilderRef,
) -> Result<BuilderRef, GraphError> {
    let Some((&index, rest)) = path.split_first() else {
        return Ok(replacement);
    };

    let node = as_node(root)?;
    let mut children = node.children().to_vec();
    let len = children.len();
    let slot = children
        .get_mut(index)
        .ok_or(GraphError::IndexOutOfRange { index, len })?;
    *slot = replace(slot, rest, replacement)?;
    Ok(node.compose(children))
}

/// Structural equality of two graphs
///
/// Graphs are equal when `eq` accepts each pair of builders at the same
/// position and every node has the same number of children.
pub fn graph_equals<E>(a: &BuilderRef, b: &BuilderRef, eq: &E) -> bool
where
    E: Fn(&dyn SpecimenBuilder, &dyn SpecimenBuilder) -> bool + ?Sized,
{
    if !eq(a.as_ref(), b.as_ref()) {
        return false;
    }
    let (left, right) = (a.children(), b.children());
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| graph_equals(l, r, eq))
}

/// Builders of the same concrete type
#[must_use]
pub fn same_kind(a: &dyn SpecimenBuilder, b: &dyn SpecimenBuilder) -> bool {
    a.as_any().type_id() == b.as_any().type_id()
}

/// The very same builder instance
#[must_use]
pub fn same_instance(a: &dyn SpecimenBuilder, b: &dyn SpecimenBuilder) -> bool {
    std::ptr::eq(
        (a as *const dyn SpecimenBuilder).cast::<()>(),
        (b as *const dyn SpecimenBuilder).cast::<()>(),
    )
}

/// Concrete type names of a builder's children
#[must_use]
pub fn child_kinds(builder: &BuilderRef) -> Vec<&'static str> {
    builder
        .children()
        .iter()
        .map(|child| child.as_ref().type_name())
        .collect()
}

/// Count builders in the graph, root included
#[must_use]
pub fn node_count(root: &BuilderRef) -> usize {
    let mut count = 0;
    walk(root, |_, _| count += 1);
    count
}

/// Check whether two handles point at the same builder
#[inline]
#[must_use]
pub fn ptr_eq(a: &BuilderRef, b: &BuilderRef) -> bool {
    Arc::ptr_eq(a, b)
}
