//! Filtering and post-processing nodes

use crate::builder::{
    compose_single, AsAny, BuildResult, BuilderNode, BuilderRef, SpecimenBuilder,
};
use crate::context::ResolutionContext;
use crate::error::ResolutionError;
use crate::request::Request;
use crate::specification::{RequestSpecification, TrueSpecification};
use crate::value::{Outcome, Value};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Forwards only requests accepted by a specification
///
/// Everything else is declined without touching the wrapped builder.
#[derive(Debug, Clone)]
pub struct FilteringBuilder {
    builder: BuilderRef,
    specification: Arc<dyn RequestSpecification>,
}

impl FilteringBuilder {
    /// Filter `builder` with `specification`
    #[inline]
    #[must_use]
    pub fn new(builder: BuilderRef, specification: Arc<dyn RequestSpecification>) -> Self {
        Self {
            builder,
            specification,
        }
    }

    /// Filter specification
    #[inline]
    #[must_use]
    pub fn specification(&self) -> &Arc<dyn RequestSpecification> {
        &self.specification
    }
}

impl SpecimenBuilder for FilteringBuilder {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        if !self.specification.is_satisfied_by(request) {
            return Ok(Outcome::declined(request));
        }
        self.builder.create(request, context)
    }

    fn as_node(&self) -> Option<&dyn BuilderNode> {
        Some(self)
    }
}

impl BuilderNode for FilteringBuilder {
    fn children(&self) -> &[BuilderRef] {
        std::slice::from_ref(&self.builder)
    }

    fn compose(&self, children: Vec<BuilderRef>) -> BuilderRef {
        Arc::new(Self::new(compose_single(children), self.specification.clone()))
    }
}

/// Action applied to a freshly created specimen
pub trait SpecimenCommand: AsAny + Send + Sync + Debug {
    /// Mutate `specimen`, resolving anything it needs through `context`
    ///
    /// # Errors
    /// Returns `ResolutionError` when a nested resolution fails.
    fn execute(
        &self,
        specimen: &mut Value,
        request: &Request,
        context: &dyn ResolutionContext,
    ) -> Result<(), ResolutionError>;
}

impl<'a> dyn SpecimenCommand + 'a {
    /// Check concrete command type
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Runs a command over values created by the wrapped builder
///
/// The command only runs for requests accepted by the specification; NoSpecimen
/// answers pass through untouched.
#[derive(Debug, Clone)]
pub struct Postprocessor {
    builder: BuilderRef,
    command: Arc<dyn SpecimenCommand>,
    specification: Arc<dyn RequestSpecification>,
}

impl Postprocessor {
    /// Run `command` on everything `builder` creates
    #[inline]
    #[must_use]
    pub fn new(builder: BuilderRef, command: Arc<dyn SpecimenCommand>) -> Self {
        Self::with_specification(builder, command, Arc::new(TrueSpecification))
    }

    /// Run `command` for requests accepted by `specification`
    #[inline]
    #[must_use]
    pub fn with_specification(
        builder: BuilderRef,
        command: Arc<dyn SpecimenCommand>,
        specification: Arc<dyn RequestSpecification>,
    ) -> Self {
        Self {
            builder,
            command,
            specification,
        }
    }

    /// Wrapped builder
    #[inline]
    #[must_use]
    pub fn builder(&self) -> &BuilderRef {
        &self.builder
    }

    /// Command run on created values
    #[inline]
    #[must_use]
    pub fn command(&self) -> &Arc<dyn SpecimenCommand> {
        &self.command
    }
}

impl SpecimenBuilder for Postprocessor {
    fn create(&self, request: &Request, context: &dyn ResolutionContext) -> BuildResult {
        match self.builder.create(request, context)? {
            Outcome::Created(mut value) => {
                if self.specification.is_satisfied_by(request) {
                    self.command.execute(&mut value, request, context)?;
                }
                Ok(Outcome::Created(value))
            }
            declined @ Outcome::NoSpecimen(_) => Ok(declined),
        }
    }

    fn as_node(&self) -> Option<&dyn BuilderNode> {
        Some(self)
    }
}

impl BuilderNode for Postprocessor {
    fn children(&self) -> &[BuilderRef] {
        std::slice::from_ref(&self.builder)
    }

    fn compose(&self, children: Vec<BuilderRef>) -> BuilderRef {
        Arc::new(Self::with_specification(
            compose_single(children),
            self.command.clone(),
            self.specification.clone(),
        ))
    }
}

/// Final stage of a pipeline: turns "nobody answered" into a hard failure
///
/// Never declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminatingBuilder;

impl SpecimenBuilder for TerminatingBuilder {
    fn create(&self, request: &Request, _context: &dyn ResolutionContext) -> BuildResult {
        tracing::debug!(request = %request, "no builder produced a specimen");
        Err(ResolutionError::ObjectCreation {
            request: request.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::resolve;
    use crate::fixed::FixedBuilder;
    use crate::specification::ExactTypeSpecification;

    #[derive(Debug)]
    struct Double;

    impl SpecimenCommand for Double {
        fn execute(
            &self,
            specimen: &mut Value,
            _request: &Request,
            _context: &dyn ResolutionContext,
        ) -> Result<(), ResolutionError> {
            if let Value::Int(v) = specimen {
                *v *= 2;
            }
            Ok(())
        }
    }

    fn fixed(v: i64) -> BuilderRef {
        Arc::new(FixedBuilder::new(v))
    }

    #[test]
    fn filter_declines_unmatched() {
        let root: BuilderRef = Arc::new(FilteringBuilder::new(
            fixed(1),
            Arc::new(ExactTypeSpecification::new("Order")),
        ));
        assert!(resolve(&root, &Request::type_named("Invoice")).unwrap().is_no_specimen());
        assert!(resolve(&root, &Request::type_named("Order")).unwrap().is_created());
    }

    #[test]
    fn postprocessor_runs_command() {
        let root: BuilderRef = Arc::new(Postprocessor::new(fixed(21), Arc::new(Double)));
        let outcome = resolve(&root, &Request::type_named("X")).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Int(42)));
    }

    #[test]
    fn postprocessor_respects_specification() {
        let root: BuilderRef = Arc::new(Postprocessor::with_specification(
            fixed(21),
            Arc::new(Double),
            Arc::new(ExactTypeSpecification::new("Order")),
        ));
        let outcome = resolve(&root, &Request::type_named("X")).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Int(21)));
    }

    #[test]
    fn terminator_always_fails() {
        let root: BuilderRef = Arc::new(TerminatingBuilder);
        let err = resolve(&root, &Request::type_named("X")).unwrap_err();
        assert!(err.is_object_creation());
    }

    #[test]
    fn filter_compose_keeps_specification() {
        let filter = FilteringBuilder::new(fixed(1), Arc::new(ExactTypeSpecification::new("Order")));
        let rebuilt = filter.compose(vec![fixed(2)]);
        let outcome = resolve(&rebuilt, &Request::type_named("Invoice")).unwrap();
        assert!(outcome.is_no_specimen());
        let outcome = resolve(&rebuilt, &Request::type_named("Order")).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Int(2)));
    }
}
