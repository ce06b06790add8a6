//! Hello-world plugin.
//!
//! Returns the configured `hello.world.message` from a `$hello-world` operation. It exists as
//! the smallest example of a provider wired to configuration.

use fhir::{CodeableConcept, IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
use ruler_core::HelloWorldProperties;

/// Provider for the `$hello-world` operation.
#[derive(Clone, Debug)]
pub struct HelloWorldProvider {
    properties: HelloWorldProperties,
}

impl HelloWorldProvider {
    pub fn new(properties: HelloWorldProperties) -> Self {
        Self { properties }
    }

    pub fn message(&self) -> &str {
        &self.properties.message
    }

    /// An informational OperationOutcome whose details text is the configured message.
    pub fn hello_world(&self) -> OperationOutcome {
        tracing::debug!(message = %self.properties.message, "$hello-world");
        OperationOutcome::new().add_issue(OperationOutcomeIssue {
            severity: IssueSeverity::Information,
            code: IssueType::Informational,
            details: Some(CodeableConcept::from_text(&self.properties.message)),
            diagnostics: None,
        })
    }
}
