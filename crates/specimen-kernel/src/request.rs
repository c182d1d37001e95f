//! Request descriptors
//!
//! Provides [`Request`], the equality-comparable description of a value the
//! caller needs. The engine itself only compares and hashes requests; the
//! variants exist so that builders can dispatch by pattern matching.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Name of a requested type
///
/// Cheap to clone; two names are equal when their text is equal.
///
/// # Examples
/// - `TypeName::of::<String>()` → `alloc::string::String`
/// - `TypeName::new("Order")` → `Order`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Create type name from text
    #[inline]
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Type name of a Rust type
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Name text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment (`alloc::string::String` → `String`)
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Seed attached to a seeded request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seed {
    /// Integer seed
    Int(i64),

    /// Text seed (commonly a member name)
    Text(Arc<str>),
}

impl Display for Seed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "\"{v}\""),
        }
    }
}

impl From<i64> for Seed {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Seed {
    fn from(v: &str) -> Self {
        Self::Text(Arc::from(v))
    }
}

/// A member (parameter, property or field) of an owning type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRequest {
    /// Type declaring the member
    pub owner: TypeName,

    /// Member name
    pub name: Arc<str>,

    /// Declared member type
    pub member_type: TypeName,
}

impl MemberRequest {
    /// Create member request
    #[inline]
    #[must_use]
    pub fn new(owner: impl Into<TypeName>, name: &str, member_type: impl Into<TypeName>) -> Self {
        Self {
            owner: owner.into(),
            name: Arc::from(name),
            member_type: member_type.into(),
        }
    }
}

impl Display for MemberRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.name, self.member_type)
    }
}

/// Description of a value to resolve
///
/// Composite kinds hold their inner request behind an `Arc` so requests stay
/// cheap to clone while they sit on recursion stacks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    /// A value of the named type
    Type(TypeName),

    /// An inner request with a seed hint
    Seeded {
        /// Wrapped request
        request: Arc<Request>,
        /// Seed value
        seed: Seed,
    },

    /// Several values for the inner request, count chosen by the engine
    Multiple(Arc<Request>),

    /// Exactly `count` values for the inner request
    FiniteSequence {
        /// Wrapped request
        request: Arc<Request>,
        /// Number of items
        count: usize,
    },

    /// A constructor or method parameter
    Parameter(MemberRequest),

    /// A writable property
    Property(MemberRequest),

    /// A public field
    Field(MemberRequest),

    /// Application-defined key
    Named(Arc<str>),
}

impl Request {
    /// Request for a value of `T`
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::Type(TypeName::of::<T>())
    }

    /// Request for a named type
    #[inline]
    #[must_use]
    pub fn type_named(name: impl AsRef<str>) -> Self {
        Self::Type(TypeName::new(name))
    }

    /// Application-defined request
    #[inline]
    #[must_use]
    pub fn named(key: &str) -> Self {
        Self::Named(Arc::from(key))
    }

    /// Wrap with a seed
    #[inline]
    #[must_use]
    pub fn seeded(self, seed: impl Into<Seed>) -> Self {
        Self::Seeded {
            request: Arc::new(self),
            seed: seed.into(),
        }
    }

    /// Wrap as a multiple request
    #[inline]
    #[must_use]
    pub fn many(self) -> Self {
        Self::Multiple(Arc::new(self))
    }

    /// Wrap as a finite sequence request
    #[inline]
    #[must_use]
    pub fn sequence(self, count: usize) -> Self {
        Self::FiniteSequence {
            request: Arc::new(self),
            count,
        }
    }

    /// Type name this request ultimately asks for, if any
    ///
    /// Seeded requests report their inner type; member requests report the
    /// member type. Multiple and sequence requests report nothing since the
    /// produced value is a list.
    #[must_use]
    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            Self::Type(name) => Some(name),
            Self::Seeded { request, .. } => request.type_name(),
            Self::Parameter(m) | Self::Property(m) | Self::Field(m) => Some(&m.member_type),
            Self::Multiple(_) | Self::FiniteSequence { .. } | Self::Named(_) => None,
        }
    }

    /// Member metadata for parameter/property/field requests
    #[inline]
    #[must_use]
    pub fn member(&self) -> Option<&MemberRequest> {
        match self {
            Self::Parameter(m) | Self::Property(m) | Self::Field(m) => Some(m),
            _ => None,
        }
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "{name}"),
            Self::Seeded { request, seed } => write!(f, "{request} (seed {seed})"),
            Self::Multiple(request) => write!(f, "many {request}"),
            Self::FiniteSequence { request, count } => write!(f, "{count} x {request}"),
            Self::Parameter(m) => write!(f, "parameter {m}"),
            Self::Property(m) => write!(f, "property {m}"),
            Self::Field(m) => write!(f, "field {m}"),
            Self::Named(key) => write!(f, "named \"{key}\""),
        }
    }
}

impl From<TypeName> for Request {
    fn from(name: TypeName) -> Self {
        Self::Type(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn type_name_of_matches_std() {
        let name = TypeName::of::<String>();
        assert_eq!(name.as_str(), std::any::type_name::<String>());
        assert_eq!(name.short_name(), "String");
    }

    #[test]
    fn requests_hash_by_value() {
        let mut set = HashSet::new();
        set.insert(Request::type_named("Order"));
        set.insert(Request::type_named("Order"));
        set.insert(Request::type_named("Order").seeded("id"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn seeded_reports_inner_type() {
        let req = Request::type_named("Order").seeded(7_i64);
        assert_eq!(req.type_name(), Some(&TypeName::new("Order")));
    }

    #[test]
    fn member_reports_member_type() {
        let req = Request::Property(MemberRequest::new("Order", "customer", "Customer"));
        assert_eq!(req.type_name(), Some(&TypeName::new("Customer")));
        assert_eq!(req.member().map(|m| &*m.name), Some("customer"));
    }

    #[test]
    fn sequence_has_no_type() {
        let req = Request::type_named("Order").sequence(3);
        assert!(req.type_name().is_none());
    }

    #[test]
    fn display_is_readable() {
        let req = Request::type_named("Order").many();
        assert_eq!(req.to_string(), "many Order");

        let req = Request::Parameter(MemberRequest::new("Order", "id", "i64"));
        assert_eq!(req.to_string(), "parameter Order.id: i64");
    }
}
