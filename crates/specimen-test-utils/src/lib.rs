//! Testing utilities for the specimen workspace
//!
//! Shared builders, request helpers and tracing setup.

#![allow(missing_docs)]

use parking_lot::Mutex;
use specimen_kernel::{
    BuildResult, BuilderRef, FactoryBuilder, FilteringBuilder, FixedBuilder, Outcome,
    ExactTypeSpecification, Record, Request, ResolutionContext, SpecimenBuilder, TypeName, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Builder that declines everything and counts how often it was asked
#[derive(Debug, Default)]
pub struct CountingBuilder {
    calls: AtomicUsize,
    answer: Option<Value>,
}

impl CountingBuilder {
    pub fn declining() -> Self {
        Self::default()
    }

    pub fn answering(value: impl Into<Value>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            answer: Some(value.into()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpecimenBuilder for CountingBuilder {
    fn create(&self, request: &Request, _context: &dyn ResolutionContext) -> BuildResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match &self.answer {
            Some(value) => Outcome::Created(value.clone()),
            None => Outcome::declined(request),
        })
    }
}

/// Builder that records every request it sees, then declines
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    seen: Mutex<Vec<Request>>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<Request> {
        self.seen.lock().clone()
    }
}

impl SpecimenBuilder for RecordingBuilder {
    fn create(&self, request: &Request, _context: &dyn ResolutionContext) -> BuildResult {
        self.seen.lock().push(request.clone());
        Ok(Outcome::declined(request))
    }
}

/// Fixed value answering only requests for `type_name`
pub fn fixed_for(type_name: &str, value: impl Into<Value>) -> BuilderRef {
    Arc::new(FilteringBuilder::new(
        Arc::new(FixedBuilder::new(value)),
        Arc::new(ExactTypeSpecification::new(type_name)),
    ))
}

/// Builder answering `Named(key)` with `key` itself
pub fn echo_named() -> BuilderRef {
    Arc::new(FactoryBuilder::new(|request, _ctx| match request {
        Request::Named(key) => Ok(Outcome::created(key.to_string())),
        _ => Ok(Outcome::declined(request)),
    }))
}

/// Builder answering `Type(name)` with a copy of `record`
///
/// Fields stay `Null`; auto-properties fill them.
pub fn record_shape(record: Record) -> BuilderRef {
    let target = record.type_name.clone();
    Arc::new(FilteringBuilder::new(
        Arc::new(FixedBuilder::new(record)),
        Arc::new(ExactTypeSpecification::new(target)),
    ))
}

/// Builder answering `Type(owner)` with a record whose fields are resolved
/// eagerly through the context, the way a constructor would
pub fn constructor_for(owner: &str, fields: &[(&str, &str)]) -> BuilderRef {
    let owner = TypeName::new(owner);
    let fields: Vec<(String, TypeName)> = fields
        .iter()
        .map(|(name, ty)| ((*name).to_string(), TypeName::new(ty)))
        .collect();
    Arc::new(FactoryBuilder::new(move |request, ctx| match request {
        Request::Type(name) if *name == owner => {
            let mut record = Record::new(owner.clone());
            for (field, ty) in &fields {
                record = record.with_field(field, ty.clone());
            }
            for field in &mut record.fields {
                match ctx.resolve(&Request::Type(field.field_type.clone()))? {
                    Outcome::Created(value) => field.value = value,
                    Outcome::NoSpecimen(_) => return Ok(Outcome::declined(request)),
                }
            }
            Ok(Outcome::Created(Value::Record(record)))
        }
        _ => Ok(Outcome::declined(request)),
    }))
}

/// Named requests for every key, in order
pub fn named_requests(keys: &[&str]) -> Vec<Request> {
    keys.iter().map(|k| Request::named(k)).collect()
}

/// Install a test-writer subscriber honouring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
