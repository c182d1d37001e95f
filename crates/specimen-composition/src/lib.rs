//! Specimen Composition
//!
//! Behaviors and graph-editing views over specimen builder trees.
//!
//! # Core Concepts
//!
//! - [`SpecimenBehavior`]: builder-to-builder transformation, folded in order
//! - [`BehaviorList`]: live, observable ordered behavior list
//! - [`SharedGraph`]: the single "current root" reference, with change events
//! - [`NodeCollection`]: list view over the children of a located node; every
//!   edit rebuilds the tree up to the root and raises [`GraphChanged`]
//! - [`TracingBehavior`]: per-request trace spans for diagnostics
//!
//! # Example
//!
//! ```rust,ignore
//! use specimen_composition::{NodeCollection, SharedGraph};
//! use specimen_kernel::MarkerTag;
//!
//! let graph = Arc::new(SharedGraph::new(root));
//! let customizations = NodeCollection::for_marker(graph.clone(), MarkerTag::Customizations);
//! customizations.insert(0, builder)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod behavior;
mod behavior_list;
mod collection;
mod event;
mod tracing_builder;

// Re-exports
pub use behavior::{
    fold_behaviors, BehaviorRef, FnBehavior, NullRecursionBehavior, RecursionHandlingBehavior,
    SpecimenBehavior, ThrowingRecursionBehavior,
};
pub use behavior_list::{BehaviorList, BehaviorsChanged};
pub use collection::{Locator, NodeCollection, SharedGraph};
pub use event::{ChangeNotifier, ChangeObserver, GraphChanged, SubscriptionId};
pub use tracing_builder::{TracingBehavior, TracingBuilder};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
