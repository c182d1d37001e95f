//! Specimen values and builder outcomes
//!
//! Provides [`Value`] for produced specimens and [`Outcome`] for the answer a
//! builder gives to a request, including the [`NoSpecimen`] sentinel.

use crate::request::{Request, TypeName};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A produced specimen
///
/// `Null` is a valid, produced value. It is distinct from [`NoSpecimen`],
/// which means the builder had no opinion about the request.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value, produced deliberately
    #[default]
    Null,

    /// Boolean
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Floating point number
    Float(f64),

    /// Text
    Text(String),

    /// Ordered items
    List(Vec<Value>),

    /// Structured value with named members
    Record(Record),

    /// Arbitrary shared payload, compared by identity
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an arbitrary payload
    #[inline]
    #[must_use]
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// Check for `Null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow an opaque payload as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(payload) => payload.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Integer content
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Text content
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// List items
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Record content
    #[inline]
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::Int(v) => write!(f, "Int({v})"),
            Self::Float(v) => write!(f, "Float({v})"),
            Self::Text(v) => write!(f, "Text({v:?})"),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Record(record) => fmt::Debug::fmt(record, f),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

/// Structured specimen: a type name plus named members
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Type this record represents
    pub type_name: TypeName,

    /// Members in declaration order
    pub fields: Vec<Field>,
}

impl Record {
    /// Create record with no fields
    #[inline]
    #[must_use]
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field with a `Null` value
    #[inline]
    #[must_use]
    pub fn with_field(mut self, name: &str, field_type: impl Into<TypeName>) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            field_type: field_type.into(),
            value: Value::Null,
        });
        self
    }

    /// Look up a field value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

/// Named member of a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Member name
    pub name: String,

    /// Declared member type
    pub field_type: TypeName,

    /// Current value
    pub value: Value,
}

/// "This builder has no opinion about the request"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoSpecimen {
    /// Declined request, kept for diagnostics
    pub request: Option<Request>,
}

impl NoSpecimen {
    /// Sentinel without diagnostics
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { request: None }
    }

    /// Sentinel recording the declined request
    #[inline]
    #[must_use]
    pub fn for_request(request: &Request) -> Self {
        Self {
            request: Some(request.clone()),
        }
    }
}

/// Answer a builder gives to a request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A specimen was produced
    Created(Value),

    /// The builder declined the request
    NoSpecimen(NoSpecimen),
}

impl Outcome {
    /// Produced value
    #[inline]
    #[must_use]
    pub fn created(value: impl Into<Value>) -> Self {
        Self::Created(value.into())
    }

    /// Decline `request`
    #[inline]
    #[must_use]
    pub fn declined(request: &Request) -> Self {
        Self::NoSpecimen(NoSpecimen::for_request(request))
    }

    /// Check whether a specimen was produced
    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// Check for the sentinel
    #[inline]
    #[must_use]
    pub fn is_no_specimen(&self) -> bool {
        matches!(self, Self::NoSpecimen(_))
    }

    /// Produced value, if any
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Created(value) => Some(value),
            Self::NoSpecimen(_) => None,
        }
    }

    /// Borrow produced value, if any
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Created(value) => Some(value),
            Self::NoSpecimen(_) => None,
        }
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Self::Created(value)
    }
}
