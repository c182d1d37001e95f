//! Specimen Core
//!
//! The [`Fixture`] composition root: assembles customizations, engine,
//! residue collectors and a terminator into one guarded pipeline and resolves
//! requests against it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use specimen_core::{Fixture, FixtureConfig};
//! use specimen_kernel::{Record, Request};
//!
//! let fixture = Fixture::with_config(FixtureConfig::new().with_repeat_count(2))?;
//! fixture.inject("i64", 42_i64)?;
//! fixture.define(Record::new("Order").with_field("id", "i64"))?;
//!
//! let order = fixture.create(&Request::type_named("Order"))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod engine;
pub mod error;
pub mod fixture;

// Re-exports
pub use config::FixtureConfig;
pub use engine::{AutoPropertiesCommand, RecordShapeBuilder};
pub use error::{FixtureError, Result};
pub use fixture::Fixture;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
