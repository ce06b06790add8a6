//! Composition shape shared by DSTU2, DSTU2.1, DSTU3 and R4.

use crate::datatypes::{CodeableConcept, Identifier, Meta, Reference};
use crate::{FhirError, FhirResult, FhirVersion};
use serde::{Deserialize, Serialize};

/// Composition lifecycle status (DSTU2 through R4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositionStatus {
    Preliminary,
    Final,
    /// DSTU2 (1.0.2) only.
    Appended,
    Amended,
    EnteredInError,
}

impl CompositionStatus {
    pub fn as_code(self) -> &'static str {
        match self {
            CompositionStatus::Preliminary => "preliminary",
            CompositionStatus::Final => "final",
            CompositionStatus::Appended => "appended",
            CompositionStatus::Amended => "amended",
            CompositionStatus::EnteredInError => "entered-in-error",
        }
    }

    /// Parse a status code for `version`.
    ///
    /// `appended` exists only in the 1.0.2 code set (both DSTU2 flavours). It was dropped from
    /// DSTU2.1 onwards.
    pub fn from_code(code: &str, version: FhirVersion) -> FhirResult<Self> {
        match code {
            "preliminary" => Ok(CompositionStatus::Preliminary),
            "final" => Ok(CompositionStatus::Final),
            "appended" if matches!(version, FhirVersion::Dstu2 | FhirVersion::Dstu2Hl7Org) => {
                Ok(CompositionStatus::Appended)
            }
            "amended" => Ok(CompositionStatus::Amended),
            "entered-in-error" => Ok(CompositionStatus::EnteredInError),
            _ => Err(FhirError::InvalidCode {
                code: code.to_string(),
                value_set: "CompositionStatus",
                version,
            }),
        }
    }
}

/// A Composition resource in the DSTU2..R4 shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,

    pub status: CompositionStatus,

    #[serde(rename = "type")]
    pub type_: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    pub date: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<Reference>,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custodian: Option<Reference>,
}
