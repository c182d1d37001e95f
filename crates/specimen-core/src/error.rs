//! Error types for the specimen fixture

use specimen_kernel::{GraphError, Request, ResolutionError};

/// Main fixture error type
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// Resolving a request failed
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Editing the builder graph violated its contract
    #[error("graph edit failed: {0}")]
    Graph(#[from] GraphError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The pipeline declined the request
    ///
    /// Only possible when behaviors cut the terminator out of the pipeline.
    #[error("no specimen was produced for {request}")]
    NoSpecimen {
        /// Declined request
        request: Request,
    },
}

impl FixtureError {
    /// Create configuration error
    #[inline]
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check for a detected request cycle
    #[inline]
    #[must_use]
    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::Resolution(e) if e.is_recursive())
    }

    /// Check for terminal creation failure
    #[inline]
    #[must_use]
    pub fn is_object_creation(&self) -> bool {
        matches!(self, Self::Resolution(e) if e.is_object_creation())
    }
}

/// Result type for fixture operations
pub type Result<T> = std::result::Result<T, FixtureError>;
