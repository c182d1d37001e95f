//! Request specifications
//!
//! Predicates over requests, used by filtering and post-processing nodes.

use crate::request::{Request, TypeName};
use std::fmt::Debug;

/// Predicate deciding whether a request is in scope
pub trait RequestSpecification: Send + Sync + Debug {
    /// Check `request`
    fn is_satisfied_by(&self, request: &Request) -> bool;
}

/// Accepts every request
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueSpecification;

impl RequestSpecification for TrueSpecification {
    #[inline]
    fn is_satisfied_by(&self, _request: &Request) -> bool {
        true
    }
}

/// Accepts plain type requests, whatever the type
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyTypeSpecification;

impl RequestSpecification for AnyTypeSpecification {
    #[inline]
    fn is_satisfied_by(&self, request: &Request) -> bool {
        matches!(request, Request::Type(_))
    }
}

/// Accepts plain type requests for exactly one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactTypeSpecification {
    target: TypeName,
}

impl ExactTypeSpecification {
    /// Accept requests for `target`
    #[inline]
    #[must_use]
    pub fn new(target: impl Into<TypeName>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Accept requests for `T`
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::new(TypeName::of::<T>())
    }

    /// Accepted type
    #[inline]
    #[must_use]
    pub fn target(&self) -> &TypeName {
        &self.target
    }
}

impl RequestSpecification for ExactTypeSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        matches!(request, Request::Type(name) if *name == self.target)
    }
}

/// Accepts exactly one request value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualRequestSpecification(pub Request);

impl RequestSpecification for EqualRequestSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        *request == self.0
    }
}

/// Specification backed by a closure
pub struct FnSpecification<F>(pub F);

impl<F> Debug for FnSpecification<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnSpecification")
    }
}

impl<F> RequestSpecification for FnSpecification<F>
where
    F: Fn(&Request) -> bool + Send + Sync,
{
    fn is_satisfied_by(&self, request: &Request) -> bool {
        (self.0)(request)
    }
}
