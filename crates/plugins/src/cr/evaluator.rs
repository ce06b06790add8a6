//! Measure evaluation seam.

use super::EvaluateMeasureParameters;
use crate::{PluginError, PluginResult};
use fhir::MeasureReport;

/// Computes a MeasureReport for a measure over validated parameters.
///
/// Implementations wrap a CQL engine and its data and terminology providers.
pub trait MeasureEvaluator: Send + Sync {
    /// Evaluate `Measure/<measure_id>`.
    fn evaluate(
        &self,
        measure_id: &str,
        parameters: &EvaluateMeasureParameters,
    ) -> PluginResult<MeasureReport>;
}

/// Evaluator used when no engine is configured; every call fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableEvaluator;

impl MeasureEvaluator for UnavailableEvaluator {
    fn evaluate(
        &self,
        measure_id: &str,
        _parameters: &EvaluateMeasureParameters,
    ) -> PluginResult<MeasureReport> {
        Err(PluginError::EvaluationUnavailable(format!(
            "no measure evaluation engine is configured (Measure/{measure_id})"
        )))
    }
}
