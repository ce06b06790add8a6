//! Clinical Practice Guidelines helpers.

use fhir::{CodeableConcept, Coding, IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};

/// Build an OperationOutcome reporting a processing error.
///
/// The outcome carries one issue with severity `error`, code `processing`, and details holding
/// a single coding whose display is `display`.
pub fn create_error_outcome(display: &str) -> OperationOutcome {
    OperationOutcome::new().add_issue(OperationOutcomeIssue {
        severity: IssueSeverity::Error,
        code: IssueType::Processing,
        details: Some(CodeableConcept::from_coding(Coding::display_only(display))),
        diagnostics: None,
    })
}
