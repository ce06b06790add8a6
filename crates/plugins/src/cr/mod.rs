//! Clinical Reasoning plugin: `$evaluate-measure`.
//!
//! The operation's inputs are read and validated here; computing the report is delegated to a
//! [`MeasureEvaluator`], the seam where a CQL engine is plugged in.

pub mod evaluator;
pub mod parameters;
pub mod provider;

pub use evaluator::{MeasureEvaluator, UnavailableEvaluator};
pub use parameters::{EvaluateMeasureParameters, ReportType};
pub use provider::MeasureEvaluateProvider;
