//! Error types for specimen resolution and graph editing

use crate::request::Request;

/// Failure while resolving a request
///
/// NoSpecimen is not an error; it travels as [`crate::Outcome::NoSpecimen`].
/// Everything here stops the resolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    /// Nothing in the pipeline produced a value
    #[error("no specimen could be created for {request}")]
    ObjectCreation {
        /// Unresolved request
        request: Request,
    },

    /// A request re-entered itself beyond the tolerated depth
    #[error("recursive request detected for {request}; request path: {}", format_path(.stack))]
    RecursiveRequest {
        /// Repeated request
        request: Request,
        /// Requests in flight, outermost first
        stack: Vec<Request>,
    },

    /// A builder recognised the request but could not satisfy it
    #[error("builder failed for {request}: {message}")]
    Builder {
        /// Request being built
        request: Request,
        /// Failure description
        message: String,
    },

    /// The request is malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ResolutionError {
    /// Create builder failure
    #[inline]
    #[must_use]
    pub fn builder(request: &Request, message: impl Into<String>) -> Self {
        Self::Builder {
            request: request.clone(),
            message: message.into(),
        }
    }

    /// Check for a detected cycle
    #[inline]
    #[must_use]
    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::RecursiveRequest { .. })
    }

    /// Check for terminal creation failure
    #[inline]
    #[must_use]
    pub fn is_object_creation(&self) -> bool {
        matches!(self, Self::ObjectCreation { .. })
    }
}

fn format_path(stack: &[Request]) -> String {
    stack
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Contract violation while locating or editing a builder graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// No node matched the locator
    #[error("no node in the graph matches the locator")]
    NodeNotFound,

    /// More than one node matched the locator
    #[error("locator is ambiguous: {matches} nodes match")]
    AmbiguousNode {
        /// Number of matching nodes
        matches: usize,
    },

    /// Child index outside the node's children
    #[error("index {index} is out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of children
        len: usize,
    },

    /// The located builder cannot be rebuilt from children
    #[error("{kind} is not a builder node")]
    NotANode {
        /// Builder type name
        kind: &'static str,
    },
}
