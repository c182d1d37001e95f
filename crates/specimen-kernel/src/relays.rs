//! Relays: builders that answer one request by resolving another
//!
//! Each relay recognises one request kind and re-enters the pipeline through
//! the context, so nested requests pass the recursion guard like any other.

use crate::builder::{BuildResult, SpecimenBuilder};
use crate::context::ResolutionContext;
use crate::request::Request;
use crate::value::{Outcome, Value};
use std::num::NonZeroUsize;

/// Items produced for a multiple request when nothing else is configured
pub const DEFAULT_REPEAT_COUNT: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(count) => count,
    None => panic!("repeat count must be non-zero"),
};

/// `Multiple(r)` → `FiniteSequence { r, count }`
#[derive(Debug, Clone, Copy)]
pub struct MultipleRelay {
    count: NonZeroUsize,
}

impl MultipleRelay {
    /// Relay producing `count` items
    #[inline]
    #[must_use]
    pub fn new(count: NonZeroUsize) -> Self {
        Self { count }
    }

    /// Items per multiple request
    #[inline]
    #[must_use]
    pub fn count(&self) -> NonZeroUsize {
        self.count
    }
}

impl Default for MultipleRelay {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_COUNT)
    }
}

impl SpecimenBuilder for MultipleRelay {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        match request {
            Request::Multiple(inner) => {
                let sequence = Request::FiniteSequence {
                    request: inner.clone(),
                    count: self.count.get(),
                };
                context.resolve(&sequence)
            }
            _ => Ok(Outcome::declined(request)),
        }
    }
}

/// Upper bound on list capacity reserved before items are resolved
const MAX_PREALLOCATED_ITEMS: usize = 64;

/// `FiniteSequence { r, count }` → list of `count` resolutions of `r`
///
/// If any item is declined the whole sequence is declined, so a later stage
/// may still answer it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteSequenceRelay;

impl SpecimenBuilder for FiniteSequenceRelay {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        let Request::FiniteSequence { request: inner, count } = request else {
            return Ok(Outcome::declined(request));
        };

        let mut items = Vec::with_capacity((*count).min(MAX_PREALLOCATED_ITEMS));
        for _ in 0..*count {
            match context.resolve(inner)? {
                Outcome::Created(value) => items.push(value),
                Outcome::NoSpecimen(_) => return Ok(Outcome::declined(request)),
            }
        }
        Ok(Outcome::Created(Value::List(items)))
    }
}

/// `Parameter`/`Property`/`Field` → `Type(member type)`
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberRelay;

impl SpecimenBuilder for MemberRelay {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        match request.member() {
            Some(member) => context.resolve(&Request::Type(member.member_type.clone())),
            None => Ok(Outcome::declined(request)),
        }
    }
}

/// `Seeded { r, .. }` → `r`
///
/// A residue collector: it only runs when no earlier stage used the seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedIgnoringRelay;

impl SpecimenBuilder for SeedIgnoringRelay {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        match request {
            Request::Seeded { request: inner, .. } => context.resolve(inner),
            _ => Ok(Outcome::declined(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderRef;
    use crate::composite::CompositeBuilder;
    use crate::context::resolve;
    use crate::filter::FilteringBuilder;
    use crate::fixed::FixedBuilder;
    use crate::request::MemberRequest;
    use crate::specification::ExactTypeSpecification;
    use std::sync::Arc;

    fn pipeline() -> BuilderRef {
        Arc::new(CompositeBuilder::new(vec![
            Arc::new(FilteringBuilder::new(
                Arc::new(FixedBuilder::new(7_i64)),
                Arc::new(ExactTypeSpecification::new("i64")),
            )),
            Arc::new(MultipleRelay::new(NonZeroUsize::new(2).unwrap())),
            Arc::new(FiniteSequenceRelay),
            Arc::new(MemberRelay),
            Arc::new(SeedIgnoringRelay),
        ]))
    }

    #[test]
    fn multiple_uses_configured_count() {
        let outcome = resolve(&pipeline(), &Request::type_named("i64").many()).unwrap();
        assert_eq!(
            outcome,
            Outcome::Created(Value::List(vec![Value::Int(7), Value::Int(7)]))
        );
    }

    #[test]
    fn sequence_declines_when_item_declines() {
        let outcome = resolve(&pipeline(), &Request::type_named("Unknown").sequence(2)).unwrap();
        assert!(outcome.is_no_specimen());
    }

    #[test]
    fn huge_sequence_of_declined_items_declines() {
        let outcome =
            resolve(&pipeline(), &Request::type_named("Unknown").sequence(usize::MAX)).unwrap();
        assert!(outcome.is_no_specimen());
    }

    #[test]
    fn empty_sequence_is_empty_list() {
        let outcome = resolve(&pipeline(), &Request::type_named("Unknown").sequence(0)).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::List(Vec::new())));
    }

    #[test]
    fn member_resolves_member_type() {
        let req = Request::Field(MemberRequest::new("Order", "quantity", "i64"));
        let outcome = resolve(&pipeline(), &req).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Int(7)));
    }

    #[test]
    fn seed_is_ignored() {
        let outcome = resolve(&pipeline(), &Request::type_named("i64").seeded("qty")).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Int(7)));
    }

    #[test]
    fn default_repeat_count_is_three() {
        assert_eq!(MultipleRelay::default().count().get(), 3);
    }
}
