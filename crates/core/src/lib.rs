//! # Ruler Core
//!
//! Core building blocks shared by the ruler plugins:
//! - Resource builders that produce release-specific FHIR resources from one fluent surface
//! - Runtime configuration resolved once at startup
//! - The crate-wide error type
//!
//! **No API concerns**: HTTP routing and operation plumbing belong in `api-rest` and
//! `ruler-plugins`.

pub mod builder;
pub mod config;
pub mod constants;
pub mod error;

pub use builder::{
    CodeableConceptSettings, CodingSettings, CompositionBuilder, ResourceBuilder,
    AUTHOR_RESOURCE_TYPES,
};
pub use config::{ConfigOverrides, HelloWorldProperties, RulerConfig};
pub use error::{RulerError, RulerResult};

// Re-export the FHIR boundary types builders hand back.
pub use fhir::{Composition, FhirVersion};
