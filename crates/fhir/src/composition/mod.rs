//! Composition wire models for every supported FHIR release.
//!
//! Releases DSTU2 through R4 share one JSON shape for the elements the ruler populates
//! ([`stu::Composition`]). R5 changed cardinalities and widened the status code system
//! ([`r5::Composition`]). [`Composition`] tags a built resource with its release so callers can
//! hand it on without caring which shape is inside.

pub mod r5;
pub mod stu;

use crate::{FhirResult, FhirVersion};
use serde::Serialize;

/// A Composition built for one specific FHIR release.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Composition {
    Dstu2(stu::Composition),
    Dstu2_1(stu::Composition),
    Dstu2Hl7Org(stu::Composition),
    Dstu3(stu::Composition),
    R4(stu::Composition),
    R5(r5::Composition),
}

impl Composition {
    /// The release this resource was built for.
    pub fn version(&self) -> FhirVersion {
        match self {
            Composition::Dstu2(_) => FhirVersion::Dstu2,
            Composition::Dstu2_1(_) => FhirVersion::Dstu2_1,
            Composition::Dstu2Hl7Org(_) => FhirVersion::Dstu2Hl7Org,
            Composition::Dstu3(_) => FhirVersion::Dstu3,
            Composition::R4(_) => FhirVersion::R4,
            Composition::R5(_) => FhirVersion::R5,
        }
    }

    /// The pre-R5 body, if this is not an R5 composition.
    pub fn as_stu(&self) -> Option<&stu::Composition> {
        match self {
            Composition::Dstu2(c)
            | Composition::Dstu2_1(c)
            | Composition::Dstu2Hl7Org(c)
            | Composition::Dstu3(c)
            | Composition::R4(c) => Some(c),
            Composition::R5(_) => None,
        }
    }

    /// The R5 body, if this is an R5 composition.
    pub fn as_r5(&self) -> Option<&r5::Composition> {
        match self {
            Composition::R5(c) => Some(c),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Composition::R5(c) => c.id.as_deref(),
            other => other.as_stu().and_then(|c| c.id.as_deref()),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Composition::R5(c) => &c.title,
            other => other.as_stu().map(|c| c.title.as_str()).unwrap_or_default(),
        }
    }

    /// The status as its FHIR code.
    pub fn status_code(&self) -> &'static str {
        match self {
            Composition::R5(c) => c.status.as_code(),
            other => other
                .as_stu()
                .map(|c| c.status.as_code())
                .unwrap_or_default(),
        }
    }

    /// Serialise to compact FHIR JSON.
    pub fn to_json(&self) -> FhirResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialise to indented FHIR JSON.
    pub fn to_json_pretty(&self) -> FhirResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
