//! Builders that answer every request they see

use crate::builder::{BuildResult, SpecimenBuilder};
use crate::context::ResolutionContext;
use crate::request::Request;
use crate::value::{Outcome, Value};
use std::fmt;

/// Returns the same value for every request
///
/// Combine with [`crate::FilteringBuilder`] to answer a single type.
#[derive(Debug, Clone)]
pub struct FixedBuilder {
    value: Value,
}

impl FixedBuilder {
    /// Create builder returning `value`
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Value handed out
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl SpecimenBuilder for FixedBuilder {
    fn create(&self, _request: &Request, _context: &dyn ResolutionContext) -> BuildResult {
        Ok(Outcome::Created(self.value.clone()))
    }
}

type FactoryFn = dyn Fn(&Request, &dyn ResolutionContext) -> BuildResult + Send + Sync;

/// Delegates every request to a closure
///
/// The closure receives the context, so it can resolve sub-requests the way a
/// constructor-invoking builder would.
pub struct FactoryBuilder {
    factory: Box<FactoryFn>,
}

impl FactoryBuilder {
    /// Create builder from closure
    #[inline]
    #[must_use]
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&Request, &dyn ResolutionContext) -> BuildResult + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
        }
    }
}

impl fmt::Debug for FactoryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryBuilder").finish_non_exhaustive()
    }
}

impl SpecimenBuilder for FactoryBuilder {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        (self.factory)(request, context)
    }
}
