//! R4 MeasureReport wire model.
//!
//! Returned by `$evaluate-measure`. Only the population counts and the contained evaluated
//! resources are modelled in detail; stratifiers and supplemental data pass through in
//! `contained`.

use crate::datatypes::{CodeableConcept, Period, Reference};
use crate::{expect_resource_type, parse_json, FhirResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Population codes from the `measure-population` code system.
pub mod population {
    pub const INITIAL_POPULATION: &str = "initial-population";
    pub const DENOMINATOR: &str = "denominator";
    pub const DENOMINATOR_EXCLUSION: &str = "denominator-exclusion";
    pub const DENOMINATOR_EXCEPTION: &str = "denominator-exception";
    pub const NUMERATOR: &str = "numerator";
    pub const NUMERATOR_EXCLUSION: &str = "numerator-exclusion";
}

/// Report status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureReportStatus {
    Complete,
    Pending,
    Error,
}

/// Report type, R4 code system `measure-report-type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureReportType {
    Individual,
    SubjectList,
    Summary,
    DataCollection,
}

/// A population count within a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureReportPopulation {
    pub code: CodeableConcept,

    #[serde(default)]
    pub count: i64,
}

/// A group of population results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureReportGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub population: Vec<MeasureReportPopulation>,
}

impl MeasureReportGroup {
    /// Count for the population whose code matches `code`.
    pub fn population_count(&self, code: &str) -> Option<i64> {
        self.population
            .iter()
            .find(|p| p.code.has_code(code))
            .map(|p| p.count)
    }
}

/// An R4 MeasureReport resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasureReport {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contained: Vec<Value>,

    pub status: MeasureReportStatus,

    #[serde(rename = "type")]
    pub type_: MeasureReportType,

    pub measure: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    pub period: Period,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group: Vec<MeasureReportGroup>,
}

impl MeasureReport {
    /// An empty, complete report for `measure` over `period`.
    pub fn new(measure: impl Into<String>, type_: MeasureReportType, period: Period) -> Self {
        Self {
            resource_type: "MeasureReport".to_string(),
            id: None,
            contained: Vec::new(),
            status: MeasureReportStatus::Complete,
            type_,
            measure: measure.into(),
            subject: None,
            date: None,
            period,
            group: Vec::new(),
        }
    }

    /// First group, if any.
    pub fn group_first_rep(&self) -> Option<&MeasureReportGroup> {
        self.group.first()
    }

    /// Contained Observations whose `code.text` equals `text`.
    pub fn contained_observation(&self, text: &str) -> Option<&Value> {
        self.contained.iter().find(|r| {
            r.get("resourceType").and_then(Value::as_str) == Some("Observation")
                && r.pointer("/code/text").and_then(Value::as_str) == Some(text)
        })
    }

    /// Parse a MeasureReport from FHIR JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError`] if the JSON does not match the wire shape or the
    /// resourceType is not `MeasureReport`.
    pub fn parse(json_text: &str) -> FhirResult<Self> {
        let report: MeasureReport = parse_json(json_text, "MeasureReport")?;
        expect_resource_type(&report.resource_type, "MeasureReport")?;
        Ok(report)
    }
}
