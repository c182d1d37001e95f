//! Default pipeline parts
//!
//! Assembles the base graph a fixture starts from:
//!
//! ```text
//! Composite
//! ├── Marker(customizations)
//! ├── [Postprocessor(auto-properties)] → Marker(engine)
//! ├── Marker(residue-collectors)
//! └── Terminator
//! ```

use specimen_kernel::{
    AnyTypeSpecification, BuildResult, BuilderRef, CompositeBuilder, FiniteSequenceRelay,
    MarkerNode, MarkerTag, MemberRelay, MemberRequest, MultipleRelay, Outcome, Postprocessor,
    Record, Request, ResolutionContext, ResolutionError, SeedIgnoringRelay, SpecimenBuilder,
    SpecimenCommand, TerminatingBuilder, TypeName, Value,
};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Built-in generators placed under the engine marker
#[must_use]
pub fn default_engine(repeat_count: NonZeroUsize) -> Vec<BuilderRef> {
    vec![
        Arc::new(MultipleRelay::new(repeat_count)),
        Arc::new(FiniteSequenceRelay),
        Arc::new(MemberRelay),
    ]
}

/// Fallbacks placed under the residue-collector marker
#[must_use]
pub fn default_residue_collectors() -> Vec<BuilderRef> {
    vec![Arc::new(SeedIgnoringRelay)]
}

/// Assemble the base graph
#[must_use]
pub fn base_graph(repeat_count: NonZeroUsize, auto_properties: bool) -> BuilderRef {
    let engine: BuilderRef = Arc::new(MarkerNode::new(
        MarkerTag::Engine,
        default_engine(repeat_count),
    ));
    let engine = if auto_properties {
        with_auto_properties(engine)
    } else {
        engine
    };

    Arc::new(CompositeBuilder::new(vec![
        Arc::new(MarkerNode::empty(MarkerTag::Customizations)),
        engine,
        Arc::new(MarkerNode::new(
            MarkerTag::ResidueCollectors,
            default_residue_collectors(),
        )),
        Arc::new(TerminatingBuilder),
    ]))
}

/// Wrap `builder` so records it creates get their fields filled
#[must_use]
pub fn with_auto_properties(builder: BuilderRef) -> BuilderRef {
    Arc::new(Postprocessor::with_specification(
        builder,
        Arc::new(AutoPropertiesCommand),
        Arc::new(AnyTypeSpecification),
    ))
}

/// Check whether `builder` is the auto-properties wrapper
#[must_use]
pub fn is_auto_properties(builder: &dyn SpecimenBuilder) -> bool {
    builder
        .downcast_ref::<Postprocessor>()
        .is_some_and(|p| p.command().as_ref().is::<AutoPropertiesCommand>())
}

/// Fills `Null` fields of created records
///
/// Each field is resolved as a property request of the record type, so it
/// passes customizations and recursion guarding like any other request.
/// Fields the producing builder already set are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPropertiesCommand;

impl SpecimenCommand for AutoPropertiesCommand {
    fn execute(
        &self,
        specimen: &mut Value,
        _request: &Request,
        context: &dyn ResolutionContext,
    ) -> Result<(), ResolutionError> {
        let Value::Record(record) = specimen else {
            return Ok(());
        };

        let owner = record.type_name.clone();
        for field in record.fields.iter_mut().filter(|f| f.value.is_null()) {
            let request = Request::Property(MemberRequest::new(
                owner.clone(),
                &field.name,
                field.field_type.clone(),
            ));
            if let Outcome::Created(value) = context.resolve(&request)? {
                field.value = value;
            }
        }
        Ok(())
    }
}

/// Answers requests for one record type with an unfilled copy of its shape
///
/// Stands in for constructor discovery: the record is created with `Null`
/// fields and auto-properties fill them.
#[derive(Debug, Clone)]
pub struct RecordShapeBuilder {
    shape: Record,
}

impl RecordShapeBuilder {
    /// Create builder for `shape`
    #[inline]
    #[must_use]
    pub fn new(shape: Record) -> Self {
        Self { shape }
    }

    /// Type answered
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        &self.shape.type_name
    }
}

impl SpecimenBuilder for RecordShapeBuilder {
    fn create(&self, request: &Request, _context: &dyn ResolutionContext) -> BuildResult {
        match request {
            Request::Type(name) if *name == self.shape.type_name => {
                Ok(Outcome::Created(Value::Record(self.shape.clone())))
            }
            _ => Ok(Outcome::declined(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specimen_kernel::graph::{child_kinds, locate};
    use specimen_kernel::{resolve, FilteringBuilder, FixedBuilder, ExactTypeSpecification};

    fn order() -> Record {
        Record::new("Order")
            .with_field("id", "i64")
            .with_field("note", "String")
    }

    #[test]
    fn base_graph_shape() {
        let graph = base_graph(NonZeroUsize::MIN, true);
        let kinds = child_kinds(&graph);
        assert_eq!(kinds.len(), 4);
        assert!(kinds[1].ends_with("Postprocessor"));
        assert!(kinds[3].ends_with("TerminatingBuilder"));
        assert_eq!(locate(&graph, &MarkerNode::locator(MarkerTag::Engine)), Ok(vec![1, 0]));

        let graph = base_graph(NonZeroUsize::MIN, false);
        assert_eq!(locate(&graph, &MarkerNode::locator(MarkerTag::Engine)), Ok(vec![1]));
    }

    #[test]
    fn auto_properties_fill_null_fields() {
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![
            Arc::new(FilteringBuilder::new(
                Arc::new(FixedBuilder::new(42_i64)),
                Arc::new(ExactTypeSpecification::new("i64")),
            )),
            Arc::new(FilteringBuilder::new(
                Arc::new(FixedBuilder::new("text")),
                Arc::new(ExactTypeSpecification::new("String")),
            )),
            Arc::new(MemberRelay),
            with_auto_properties(Arc::new(RecordShapeBuilder::new(order()))),
        ]));

        let value = resolve(&root, &Request::type_named("Order"))
            .unwrap()
            .into_value()
            .unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record.get("id"), Some(&Value::Int(42)));
        assert_eq!(record.get("note"), Some(&Value::from("text")));
    }

    #[test]
    fn assigned_fields_are_kept() {
        let mut shape = order();
        shape.fields[0].value = Value::Int(7);
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![
            Arc::new(FilteringBuilder::new(
                Arc::new(FixedBuilder::new(1_i64)),
                Arc::new(ExactTypeSpecification::new("i64")),
            )),
            Arc::new(FilteringBuilder::new(
                Arc::new(FixedBuilder::new("x")),
                Arc::new(ExactTypeSpecification::new("String")),
            )),
            Arc::new(MemberRelay),
            with_auto_properties(Arc::new(RecordShapeBuilder::new(shape))),
        ]));

        let value = resolve(&root, &Request::type_named("Order"))
            .unwrap()
            .into_value()
            .unwrap();
        assert_eq!(value.as_record().unwrap().get("id"), Some(&Value::Int(7)));
    }

    #[test]
    fn detects_auto_properties_wrapper() {
        let wrapped = with_auto_properties(Arc::new(CompositeBuilder::default()));
        assert!(is_auto_properties(wrapped.as_ref()));
        assert!(!is_auto_properties(&CompositeBuilder::default()));
    }

    #[test]
    fn shape_builder_declines_other_types() {
        let root: BuilderRef = Arc::new(RecordShapeBuilder::new(order()));
        assert!(resolve(&root, &Request::type_named("Invoice"))
            .unwrap()
            .is_no_specimen());
    }
}
