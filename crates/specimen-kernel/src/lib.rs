//! Specimen Kernel (specimen-kernel)
//!
//! Contracts and core nodes of the specimen resolution engine.
//!
//! # Core Concepts
//!
//! - [`Request`]: description of the value wanted
//! - [`Outcome`]: a created [`Value`] or the [`NoSpecimen`] sentinel
//! - [`SpecimenBuilder`]: turns a request into an outcome
//! - [`BuilderNode`]: builder with ordered children, rebuilt via `compose`
//! - [`CompositeBuilder`]: first-match-wins dispatch over children
//! - [`MarkerNode`]: pass-through bookmark located again by [`MarkerTag`]
//! - [`RecursionGuard`]: cycle detection with pluggable handling
//! - [`graph`]: locating, replacing and comparing nodes in a builder tree
//!
//! # Example
//!
//! ```rust,ignore
//! use specimen_kernel::{resolve, CompositeBuilder, FixedBuilder, Request};
//!
//! let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![
//!     Arc::new(FixedBuilder::new(42_i64)),
//! ]));
//! let outcome = resolve(&root, &Request::type_named("i64"))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builder;
mod composite;
mod context;
mod error;
mod filter;
mod fixed;
mod marker;
mod relays;
mod request;
mod specification;
mod value;

pub mod graph;
pub mod recursion;

// Re-exports
pub use builder::{compose_single, AsAny, BuildResult, BuilderNode, BuilderRef, SpecimenBuilder};
pub use composite::{dispatch, CompositeBuilder};
pub use context::{resolve, ResolutionContext, SpecimenContext};
pub use error::{GraphError, ResolutionError};
pub use filter::{FilteringBuilder, Postprocessor, SpecimenCommand, TerminatingBuilder};
pub use fixed::{FactoryBuilder, FixedBuilder};
pub use marker::{MarkerNode, MarkerTag};
pub use recursion::{
    NullRecursionHandler, RecursionGuard, RecursionHandler, RequestComparer,
    ThrowingRecursionHandler, DEFAULT_RECURSION_DEPTH,
};
pub use relays::{
    FiniteSequenceRelay, MemberRelay, MultipleRelay, SeedIgnoringRelay, DEFAULT_REPEAT_COUNT,
};
pub use request::{MemberRequest, Request, Seed, TypeName};
pub use specification::{
    AnyTypeSpecification, EqualRequestSpecification, ExactTypeSpecification, FnSpecification,
    RequestSpecification, TrueSpecification,
};
pub use value::{Field, NoSpecimen, Outcome, Record, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
