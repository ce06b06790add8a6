use crate::cpg::create_error_outcome;
use fhir::OperationOutcome;

/// Errors returned by plugin operations.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("measure evaluation is not available: {0}")]
    EvaluationUnavailable(String),

    #[error("measure evaluation failed: {0}")]
    Evaluation(String),

    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),
}

impl PluginError {
    /// True for errors caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PluginError::MissingParameter(_)
                | PluginError::InvalidParameter { .. }
                | PluginError::Fhir(_)
        )
    }

    /// Render this error as an OperationOutcome for the caller.
    pub fn to_outcome(&self) -> OperationOutcome {
        create_error_outcome(&self.to_string())
    }
}

pub type PluginResult<T> = std::result::Result<T, PluginError>;
