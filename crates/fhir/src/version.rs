//! FHIR release selection.
//!
//! The server is configured for exactly one FHIR release at startup. Builders branch on this
//! value to produce the release-specific resource shape.

use crate::FhirError;
use std::fmt;
use std::str::FromStr;

/// A FHIR specification release supported by the ruler.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FhirVersion {
    /// DSTU2 (1.0.2), HAPI structures flavour.
    Dstu2,
    /// DSTU2.1 (1.4.0, May 2016 ballot).
    Dstu2_1,
    /// DSTU2 (1.0.2), HL7 org structures flavour.
    Dstu2Hl7Org,
    /// STU3 (3.0.2).
    Dstu3,
    /// R4 (4.0.1).
    R4,
    /// R5 (5.0.0).
    R5,
}

impl FhirVersion {
    /// Every supported release, oldest first.
    pub const ALL: [FhirVersion; 6] = [
        FhirVersion::Dstu2,
        FhirVersion::Dstu2_1,
        FhirVersion::Dstu2Hl7Org,
        FhirVersion::Dstu3,
        FhirVersion::R4,
        FhirVersion::R5,
    ];

    /// The configuration spelling of this release (`dstu2`, `r4`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            FhirVersion::Dstu2 => "dstu2",
            FhirVersion::Dstu2_1 => "dstu2_1",
            FhirVersion::Dstu2Hl7Org => "dstu2_hl7org",
            FhirVersion::Dstu3 => "dstu3",
            FhirVersion::R4 => "r4",
            FhirVersion::R5 => "r5",
        }
    }

    /// The published specification version string.
    pub fn fhir_release(self) -> &'static str {
        match self {
            FhirVersion::Dstu2 | FhirVersion::Dstu2Hl7Org => "1.0.2",
            FhirVersion::Dstu2_1 => "1.4.0",
            FhirVersion::Dstu3 => "3.0.2",
            FhirVersion::R4 => "4.0.1",
            FhirVersion::R5 => "5.0.0",
        }
    }
}

impl fmt::Display for FhirVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FhirVersion {
    type Err = FhirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        FhirVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == normalised)
            .ok_or_else(|| FhirError::UnsupportedVersion(s.to_string()))
    }
}
