//! General-purpose FHIR datatypes.
//!
//! Coding, CodeableConcept, Reference, Identifier, Meta and Period have the same JSON shape in
//! every release the ruler supports, so one definition serves all of them.

use serde::{Deserialize, Serialize};

/// A reference to a code defined by a terminology system.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    /// A coding with a system and code and an optional display.
    pub fn new(system: impl Into<String>, code: impl Into<String>, display: Option<String>) -> Self {
        Self {
            system: Some(system.into()),
            version: None,
            code: Some(code.into()),
            display,
        }
    }

    /// A coding carrying only a display string.
    pub fn display_only(display: impl Into<String>) -> Self {
        Self {
            display: Some(display.into()),
            ..Self::default()
        }
    }
}

/// A concept that may be defined by one or more codings, plus free text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            coding: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// First coding, if any.
    pub fn coding_first_rep(&self) -> Option<&Coding> {
        self.coding.first()
    }

    /// True when any coding carries `code` (system ignored).
    pub fn has_code(&self, code: &str) -> bool {
        self.coding.iter().any(|c| c.code.as_deref() == Some(code))
    }
}

/// A reference from one resource to another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Build a reference, treating an empty string as absent.
    ///
    /// Returns `None` when there is nothing to point at, so callers can skip the element.
    pub fn from_literal(reference: Option<&str>) -> Option<Self> {
        reference.filter(|r| !r.is_empty()).map(|r| Self {
            reference: Some(r.to_string()),
            display: None,
        })
    }

    /// The resource type part of a relative reference (`Patient` in `Patient/123`).
    pub fn resource_type(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.split_once('/'))
            .map(|(resource_type, _)| resource_type)
    }
}

/// A business identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Resource metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,

    #[serde(rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Meta {
    /// Meta holding only profiles, or `None` if there are none.
    pub fn with_profiles(profile: &[String]) -> Option<Self> {
        if profile.is_empty() {
            return None;
        }
        Some(Self {
            profile: profile.to_vec(),
            last_updated: None,
        })
    }
}

/// A time range defined by start and end date/times.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}
