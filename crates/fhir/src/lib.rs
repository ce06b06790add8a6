//! FHIR wire/boundary support for the ruler plugins.
//!
//! This crate provides **wire models** for the handful of FHIR resources the ruler builds or
//! consumes, across the FHIR releases the server can be configured for:
//! - Composition, in every supported release (DSTU2 through R5)
//! - OperationOutcome, Parameters and MeasureReport (R4)
//!
//! This crate focuses on:
//! - FHIR JSON serialisation/deserialisation of those shapes
//! - release-specific code systems (for example Composition status)
//! - the release enum used to dispatch between incompatible resource shapes
//!
//! It is NOT a general FHIR object model. Resources outside the list above are carried as raw
//! JSON when they need to pass through.

pub mod composition;
pub mod datatypes;
pub mod measure_report;
pub mod operation_outcome;
pub mod parameters;
pub mod version;

// Re-export facades
pub use composition::Composition;
pub use measure_report::MeasureReport;
pub use operation_outcome::OperationOutcome;
pub use parameters::Parameters;
pub use version::FhirVersion;

// Re-export public datatypes
pub use datatypes::{CodeableConcept, Coding, Identifier, Meta, Period, Reference};
pub use operation_outcome::{IssueSeverity, IssueType, OperationOutcomeIssue};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported FHIR version: {0}")]
    UnsupportedVersion(String),

    #[error("'{code}' is not a valid {value_set} code for FHIR {version}")]
    InvalidCode {
        code: String,
        value_set: &'static str,
        version: FhirVersion,
    },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;

/// Deserialize `T` from JSON text, reporting the path to the first mismatching field.
///
/// `label` names the resource in the error message, e.g. `Parameters schema mismatch at
/// parameter[0].name: ...`.
pub(crate) fn parse_json<T>(json_text: &str, label: &str) -> FhirResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(FhirError::Translation(format!(
                "{label} schema mismatch at {path}: {source}"
            )))
        }
    }
}

/// Check that a parsed resource declares the expected `resourceType`.
pub(crate) fn expect_resource_type(found: &str, expected: &str) -> FhirResult<()> {
    if found != expected {
        return Err(FhirError::InvalidInput(format!(
            "Expected resourceType '{expected}', got '{found}'"
        )));
    }
    Ok(())
}
