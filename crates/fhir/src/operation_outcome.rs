//! R4 OperationOutcome wire model.
//!
//! Operations report failures (and occasionally informational messages) as an OperationOutcome
//! with one or more issues.

use crate::datatypes::CodeableConcept;
use crate::{expect_resource_type, parse_json, FhirResult};
use serde::{Deserialize, Serialize};

/// How severe an issue is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

/// The subset of the R4 `issue-type` code system the ruler emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Invalid,
    Required,
    Value,
    NotFound,
    NotSupported,
    Processing,
    Exception,
    Informational,
}

/// A single issue within an OperationOutcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcomeIssue {
    pub severity: IssueSeverity,

    pub code: IssueType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// An R4 OperationOutcome resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub issue: Vec<OperationOutcomeIssue>,
}

impl Default for OperationOutcome {
    fn default() -> Self {
        Self {
            resource_type: "OperationOutcome".to_string(),
            id: None,
            issue: Vec::new(),
        }
    }
}

impl OperationOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue and return the outcome, for chained construction.
    pub fn add_issue(mut self, issue: OperationOutcomeIssue) -> Self {
        self.issue.push(issue);
        self
    }

    /// True when any issue is `error` or `fatal`.
    pub fn has_errors(&self) -> bool {
        self.issue
            .iter()
            .any(|i| matches!(i.severity, IssueSeverity::Error | IssueSeverity::Fatal))
    }

    /// Parse an OperationOutcome from FHIR JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError`] if the JSON does not match the wire shape or the
    /// resourceType is not `OperationOutcome`.
    pub fn parse(json_text: &str) -> FhirResult<Self> {
        let outcome: OperationOutcome = parse_json(json_text, "OperationOutcome")?;
        expect_resource_type(&outcome.resource_type, "OperationOutcome")?;
        Ok(outcome)
    }
}
