//! Recursion detection
//!
//! - [`RecursionGuard`]: node that detects request cycles within one call
//! - [`RecursionHandler`]: policy deciding what a detected cycle resolves to
//! - [`RequestComparer`]: equality used to recognise a repeated request
//! - [`RequestTracker`]: per-call request stacks carried by the context

mod comparer;
mod guard;
mod handler;
mod stack;

pub use comparer::{DefaultRequestComparer, FnComparer, RequestComparer, TypeOnlyComparer};
pub use guard::{RecursionGuard, DEFAULT_RECURSION_DEPTH};
pub use handler::{
    FnRecursionHandler, NullRecursionHandler, RecursionHandler, ThrowingRecursionHandler,
};
pub use stack::{GuardId, RequestStack, RequestTracker, StackFrame};
