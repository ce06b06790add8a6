//! Fluent builders for FHIR resources.
//!
//! A builder is configured once through chained `with_*` calls and consumed by `build()`, which
//! validates the accumulated settings and produces the resource in the shape of the configured
//! FHIR release.

pub mod codeable_concept;
pub mod composition;
pub mod reference;
pub mod resource;

pub use codeable_concept::{CodeableConceptSettings, CodingSettings};
pub use composition::CompositionBuilder;
pub use reference::{normalize_reference, validate_author_reference, AUTHOR_RESOURCE_TYPES};
pub use resource::{ResourceBase, ResourceBuilder};
