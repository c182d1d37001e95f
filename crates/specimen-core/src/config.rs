//! Fixture configuration

use crate::error::{FixtureError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Fixture settings
///
/// Every field has a default, so partial JSON/TOML documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Occurrences of a request tolerated on one resolution path before the
    /// recursion handler fires
    pub recursion_depth: usize,
    /// Items produced for a multiple request
    pub repeat_count: usize,
    /// Skip filling record fields after creation
    pub omit_auto_properties: bool,
    /// Wrap the pipeline in a per-request trace span
    pub trace_requests: bool,
}

impl FixtureConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With recursion depth
    #[inline]
    #[must_use]
    pub fn with_recursion_depth(mut self, depth: usize) -> Self {
        self.recursion_depth = depth;
        self
    }

    /// With repeat count
    #[inline]
    #[must_use]
    pub fn with_repeat_count(mut self, count: usize) -> Self {
        self.repeat_count = count;
        self
    }

    /// With auto-properties switched off
    #[inline]
    #[must_use]
    pub fn with_omit_auto_properties(mut self, omit: bool) -> Self {
        self.omit_auto_properties = omit;
        self
    }

    /// With request tracing
    #[inline]
    #[must_use]
    pub fn with_trace_requests(mut self, trace: bool) -> Self {
        self.trace_requests = trace;
        self
    }

    /// Check every setting
    ///
    /// # Errors
    /// Returns [`FixtureError::Config`] for a zero depth or repeat count.
    pub fn validate(&self) -> Result<()> {
        self.depth()?;
        self.repeat()?;
        Ok(())
    }

    /// Recursion depth as a non-zero count
    ///
    /// # Errors
    /// Returns [`FixtureError::Config`] when the depth is zero.
    pub fn depth(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.recursion_depth)
            .ok_or_else(|| FixtureError::config("recursion_depth must be at least 1"))
    }

    /// Repeat count as a non-zero count
    ///
    /// # Errors
    /// Returns [`FixtureError::Config`] when the count is zero.
    pub fn repeat(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.repeat_count)
            .ok_or_else(|| FixtureError::config("repeat_count must be at least 1"))
    }

    /// Parse and validate a JSON document
    ///
    /// # Errors
    /// Returns [`FixtureError::Config`] for malformed or invalid settings.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| FixtureError::config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns [`FixtureError::Config`] for malformed or invalid settings.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| FixtureError::config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            recursion_depth: 1,
            repeat_count: 3,
            omit_auto_properties: false,
            trace_requests: false,
        }
    }
}
