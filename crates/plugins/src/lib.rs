//! # Ruler Plugins
//!
//! Operation providers layered on the core builders:
//! - `hello_world`: a configurable greeting operation, the template for new plugins
//! - `cpg`: Clinical Practice Guidelines helpers (error outcomes)
//! - `cr`: Clinical Reasoning, `$evaluate-measure` parameter handling over a pluggable
//!   measure evaluator
//!
//! Providers are plain structs holding their configuration; transport lives in `api-rest`.

pub mod cpg;
pub mod cr;
pub mod error;
pub mod hello_world;

pub use cr::{EvaluateMeasureParameters, MeasureEvaluateProvider, MeasureEvaluator, ReportType};
pub use error::{PluginError, PluginResult};
pub use hello_world::HelloWorldProvider;
