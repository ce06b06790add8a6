//! Composition shape for R5.
//!
//! R5 allows several subjects and identifiers and uses a wider status code system than the
//! earlier releases.

use crate::datatypes::{CodeableConcept, Identifier, Meta, Reference};
use crate::{FhirError, FhirResult, FhirVersion};
use serde::{Deserialize, Serialize};

/// Composition lifecycle status (R5 `CompositionStatus` code system).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositionStatus {
    Registered,
    Partial,
    Preliminary,
    Final,
    Amended,
    Corrected,
    Appended,
    Cancelled,
    EnteredInError,
    Deprecated,
    Unknown,
}

impl CompositionStatus {
    const CODES: [(&'static str, CompositionStatus); 11] = [
        ("registered", CompositionStatus::Registered),
        ("partial", CompositionStatus::Partial),
        ("preliminary", CompositionStatus::Preliminary),
        ("final", CompositionStatus::Final),
        ("amended", CompositionStatus::Amended),
        ("corrected", CompositionStatus::Corrected),
        ("appended", CompositionStatus::Appended),
        ("cancelled", CompositionStatus::Cancelled),
        ("entered-in-error", CompositionStatus::EnteredInError),
        ("deprecated", CompositionStatus::Deprecated),
        ("unknown", CompositionStatus::Unknown),
    ];

    pub fn as_code(self) -> &'static str {
        Self::CODES
            .iter()
            .find(|(_, status)| *status == self)
            .map(|(code, _)| *code)
            .unwrap_or("unknown")
    }

    pub fn from_code(code: &str) -> FhirResult<Self> {
        Self::CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, status)| *status)
            .ok_or_else(|| FhirError::InvalidCode {
                code: code.to_string(),
                value_set: "CompositionStatus",
                version: FhirVersion::R5,
            })
    }
}

/// A Composition resource in the R5 shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,

    pub status: CompositionStatus,

    #[serde(rename = "type")]
    pub type_: CodeableConcept,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject: Vec<Reference>,

    pub date: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<Reference>,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custodian: Option<Reference>,
}
