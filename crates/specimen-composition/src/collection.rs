//! List views over a located subtree
//!
//! A [`NodeCollection`] presents the children of one node as an ordered list.
//! The node is found by a locator predicate, re-evaluated on every call, in
//! the current root of a [`SharedGraph`]. Nothing is edited in place: every
//! mutation composes a new node, rebuilds its ancestors up to the root, swaps
//! the root and raises exactly one [`GraphChanged`].
//!
//! # Concurrency
//! The root is read once at the start of an edit and written once at the end.
//! Two edits racing on the same graph are not merged: the later swap wins and
//! the earlier edit is lost. Events are delivered after the swap, so their
//! order relative to racing swaps is unspecified.

use crate::event::{ChangeNotifier, GraphChanged, SubscriptionId};
use parking_lot::RwLock;
use specimen_kernel::graph::{self, NodePath};
use specimen_kernel::{BuilderRef, GraphError, MarkerNode, MarkerTag, SpecimenBuilder};
use std::fmt;
use std::sync::Arc;

/// Predicate identifying the node a collection views
pub type Locator = Arc<dyn Fn(&dyn SpecimenBuilder) -> bool + Send + Sync>;

/// The single "current root" reference shared by collections and their owner
pub struct SharedGraph {
    root: RwLock<BuilderRef>,
    notifier: ChangeNotifier<GraphChanged>,
}

impl SharedGraph {
    /// Share `root`
    #[inline]
    #[must_use]
    pub fn new(root: BuilderRef) -> Self {
        Self {
            root: RwLock::new(root),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Current root
    #[inline]
    #[must_use]
    pub fn current(&self) -> BuilderRef {
        self.root.read().clone()
    }

    /// Replace the root and notify observers
    pub fn swap(&self, graph: BuilderRef) {
        *self.root.write() = graph.clone();
        self.notifier.notify(&GraphChanged { graph });
    }

    /// Observe root swaps
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&GraphChanged) + Send + Sync + 'static,
    {
        self.notifier.subscribe(observer)
    }

    /// Stop observing
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

impl fmt::Debug for SharedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedGraph")
            .field("root", &self.current())
            .field("notifier", &self.notifier)
            .finish()
    }
}

/// Ordered list view over the children of a located node
#[derive(Clone)]
pub struct NodeCollection {
    graph: Arc<SharedGraph>,
    locator: Locator,
    label: Arc<str>,
}

impl NodeCollection {
    /// View the children of the node matching `locator`
    #[must_use]
    pub fn new<F>(graph: Arc<SharedGraph>, label: &str, locator: F) -> Self
    where
        F: Fn(&dyn SpecimenBuilder) -> bool + Send + Sync + 'static,
    {
        Self {
            graph,
            locator: Arc::new(locator),
            label: Arc::from(label),
        }
    }

    /// View the children of the marker tagged `tag`
    #[must_use]
    pub fn for_marker(graph: Arc<SharedGraph>, tag: MarkerTag) -> Self {
        let label = tag.to_string();
        Self::new(graph, &label, MarkerNode::locator(tag))
    }

    /// Name used in logs
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current root of the viewed graph
    #[inline]
    #[must_use]
    pub fn graph(&self) -> BuilderRef {
        self.graph.current()
    }

    /// Observe edits to the viewed graph
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&GraphChanged) + Send + Sync + 'static,
    {
        self.graph.subscribe(observer)
    }

    /// Stop observing
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.graph.unsubscribe(id)
    }

    /// Path of the viewed node in the current root
    ///
    /// # Errors
    /// Returns [`GraphError::NodeNotFound`] or [`GraphError::AmbiguousNode`]
    /// when the locator does not match exactly one node.
    pub fn path(&self) -> Result<NodePath, GraphError> {
        graph::locate(&self.graph.current(), &*self.locator)
    }

    /// Current children of the viewed node
    ///
    /// # Errors
    /// Returns `GraphError` when the node cannot be located.
    pub fn to_vec(&self) -> Result<Vec<BuilderRef>, GraphError> {
        let (_, target) = self.target(&self.graph.current())?;
        Ok(target.children().to_vec())
    }

    /// Number of children
    ///
    /// # Errors
    /// Returns `GraphError` when the node cannot be located.
    pub fn len(&self) -> Result<usize, GraphError> {
        let (_, target) = self.target(&self.graph.current())?;
        Ok(target.children().len())
    }

    /// Check for no children
    ///
    /// # Errors
    /// Returns `GraphError` when the node cannot be located.
    pub fn is_empty(&self) -> Result<bool, GraphError> {
        Ok(self.len()? == 0)
    }

    /// Child at `index`
    ///
    /// # Errors
    /// Returns [`GraphError::IndexOutOfRange`] for a bad index.
    pub fn get(&self, index: usize) -> Result<BuilderRef, GraphError> {
        let (_, target) = self.target(&self.graph.current())?;
        let children = target.children();
        children
            .get(index)
            .cloned()
            .ok_or(GraphError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    /// Position of `builder`, compared by identity
    ///
    /// # Errors
    /// Returns `GraphError` when the node cannot be located.
    pub fn index_of(&self, builder: &BuilderRef) -> Result<Option<usize>, GraphError> {
        let (_, target) = self.target(&self.graph.current())?;
        Ok(target
            .children()
            .iter()
            .position(|child| graph::ptr_eq(child, builder)))
    }

    /// Check whether `builder` is a child, compared by identity
    ///
    /// # Errors
    /// Returns `GraphError` when the node cannot be located.
    pub fn contains(&self, builder: &BuilderRef) -> Result<bool, GraphError> {
        Ok(self.index_of(builder)?.is_some())
    }

    /// Insert `builder` before position `index`
    ///
    /// # Errors
    /// Returns [`GraphError::IndexOutOfRange`] when `index > len`.
    pub fn insert(&self, index: usize, builder: BuilderRef) -> Result<(), GraphError> {
        self.edit("insert", Some(index), |children| {
            if index > children.len() {
                return Err(GraphError::IndexOutOfRange {
                    index,
                    len: children.len(),
                });
            }
            children.insert(index, builder);
            Ok(())
        })
    }

    /// Append `builder`
    ///
    /// # Errors
    /// Returns `GraphError` when the node cannot be located.
    pub fn add(&self, builder: BuilderRef) -> Result<(), GraphError> {
        self.edit("add", None, |children| {
            children.push(builder);
            Ok(())
        })
    }

    /// Replace the child at `index`, returning the old one
    ///
    /// # Errors
    /// Returns [`GraphError::IndexOutOfRange`] for a bad index.
    pub fn set(&self, index: usize, builder: BuilderRef) -> Result<BuilderRef, GraphError> {
        self.edit("set", Some(index), |children| {
            let len = children.len();
            let slot = children
                .get_mut(index)
                .ok_or(GraphError::IndexOutOfRange { index, len })?;
            Ok(std::mem::replace(slot, builder))
        })
    }

    /// Remove the child at `index`, returning it
    ///
    /// # Errors
    /// Returns [`GraphError::IndexOutOfRange`] for a bad index.
    pub fn remove_at(&self, index: usize) -> Result<BuilderRef, GraphError> {
        self.edit("remove_at", Some(index), |children| {
            if index >= children.len() {
                return Err(GraphError::IndexOutOfRange {
                    index,
                    len: children.len(),
                });
            }
            Ok(children.remove(index))
        })
    }

    /// Remove `builder` if present, compared by identity
    ///
    /// Nothing changes and no event fires when `builder` is not a child.
    ///
    /// # Errors
    /// Returns `GraphError` when the node cannot be located.
    pub fn remove(&self, builder: &BuilderRef) -> Result<bool, GraphError> {
        match self.index_of(builder)? {
            Some(index) => self.remove_at(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Remove every child
    ///
    /// # Errors
    /// Returns `GraphError` when the node cannot be located.
    pub fn clear(&self) -> Result<(), GraphError> {
        self.edit("clear", None, |children| {
            children.clear();
            Ok(())
        })
    }

    fn target(&self, root: &BuilderRef) -> Result<(NodePath, BuilderRef), GraphError> {
        let path = graph::locate(root, &*self.locator)?;
        let target = graph::node_at(root, &path)?;
        graph::as_node(&target)?;
        Ok((path, target))
    }

    /// Apply `change` to the child list, rebuild, swap and notify
    ///
    /// Fails before the swap when anything goes wrong, so a failed edit leaves
    /// the graph and observers untouched.
    fn edit<R, F>(
        &self,
        operation: &'static str,
        index: Option<usize>,
        change: F,
    ) -> Result<R, GraphError>
    where
        F: FnOnce(&mut Vec<BuilderRef>) -> Result<R, GraphError>,
    {
        let root = self.graph.current();
        let (path, target) = self.target(&root)?;
        let node = graph::as_node(&target)?;

        let mut children = node.children().to_vec();
        let output = change(&mut children)?;
        let count = children.len();
        let rebuilt = node.compose(children);
        let new_root = graph::replace(&root, &path, rebuilt)?;

        tracing::debug!(
            collection = %self.label,
            operation,
            index = ?index,
            children = count,
            "graph edited"
        );
        self.graph.swap(new_root);
        Ok(output)
    }
}

impl fmt::Debug for NodeCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCollection")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
