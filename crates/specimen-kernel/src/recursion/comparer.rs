//! Request equality strategies used for cycle detection

use crate::request::Request;
use std::fmt::Debug;

/// Decides whether two requests count as "the same" for recursion tracking
pub trait RequestComparer: Send + Sync + Debug {
    /// Compare two requests
    fn equals(&self, a: &Request, b: &Request) -> bool;
}

/// Value equality
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRequestComparer;

impl RequestComparer for DefaultRequestComparer {
    #[inline]
    fn equals(&self, a: &Request, b: &Request) -> bool {
        a == b
    }
}

/// Equal when both requests resolve to the same type name
///
/// Ignores seeds and member metadata, so `Order` requested as a property of
/// two different owners still counts as a repeat. Requests without a type
/// fall back to value equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeOnlyComparer;

impl RequestComparer for TypeOnlyComparer {
    fn equals(&self, a: &Request, b: &Request) -> bool {
        match (a.type_name(), b.type_name()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        }
    }
}

/// Comparer backed by a closure
pub struct FnComparer<F>(pub F);

impl<F> Debug for FnComparer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnComparer")
    }
}

impl<F> RequestComparer for FnComparer<F>
where
    F: Fn(&Request, &Request) -> bool + Send + Sync,
{
    fn equals(&self, a: &Request, b: &Request) -> bool {
        (self.0)(a, b)
    }
}
