//! `$evaluate-measure` input parameters.

use crate::{PluginError, PluginResult};
use chrono::{DateTime, Months, NaiveDate};
use fhir::measure_report::MeasureReportType;
use fhir::{Parameters, Period};
use ruler_core::builder::normalize_reference;
use serde_json::Value;

/// Kind of report requested from `$evaluate-measure`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportType {
    /// Legacy spelling of [`ReportType::Subject`].
    Individual,
    Subject,
    SubjectList,
    Population,
}

impl ReportType {
    pub fn from_code(code: &str) -> PluginResult<Self> {
        match code {
            "individual" => Ok(ReportType::Individual),
            "subject" => Ok(ReportType::Subject),
            "subject-list" => Ok(ReportType::SubjectList),
            "population" => Ok(ReportType::Population),
            other => Err(PluginError::InvalidParameter {
                name: "reportType",
                reason: format!("unknown report type '{other}'"),
            }),
        }
    }

    /// True when the report is about a single subject.
    pub fn requires_subject(self) -> bool {
        matches!(self, ReportType::Individual | ReportType::Subject)
    }

    /// The MeasureReport.type the evaluation should produce.
    pub fn measure_report_type(self) -> MeasureReportType {
        match self {
            ReportType::Individual | ReportType::Subject => MeasureReportType::Individual,
            ReportType::SubjectList => MeasureReportType::SubjectList,
            ReportType::Population => MeasureReportType::Summary,
        }
    }
}

/// Validated `$evaluate-measure` inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluateMeasureParameters {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub report_type: ReportType,
    /// `Patient/<id>` or `Group/<id>`.
    pub subject: Option<String>,
    /// `Practitioner/<id>`.
    pub practitioner: Option<String>,
    pub last_received_on: Option<NaiveDate>,
    pub product_line: Option<String>,
    /// A Bundle of extra data made available to the evaluation.
    pub additional_data: Option<Value>,
    /// An Endpoint used for terminology lookups.
    pub terminology_endpoint: Option<Value>,
}

impl EvaluateMeasureParameters {
    /// Read and validate the operation's Parameters resource.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] if:
    /// - `periodStart` or `periodEnd` is missing or not a date,
    /// - `periodStart` is after `periodEnd`,
    /// - `subject` references something other than a Patient or Group,
    /// - `reportType` is unknown, or is subject-scoped without a `subject`,
    /// - `additionalData` is not a Bundle or `terminologyEndpoint` is not an Endpoint.
    pub fn from_parameters(parameters: &Parameters) -> PluginResult<Self> {
        let period_start = required_date(parameters, "periodStart", SpanEdge::Start)?;
        let period_end = required_date(parameters, "periodEnd", SpanEdge::End)?;
        if period_start > period_end {
            return Err(PluginError::InvalidParameter {
                name: "periodStart",
                reason: format!("{period_start} is after periodEnd {period_end}"),
            });
        }

        let subject = non_empty(parameters.get_value("subject"))
            .map(subject_reference)
            .transpose()?;

        let report_type = match non_empty(parameters.get_value("reportType")) {
            Some(code) => ReportType::from_code(code)?,
            None if subject.is_some() => ReportType::Subject,
            None => ReportType::Population,
        };
        if report_type.requires_subject() && subject.is_none() {
            return Err(PluginError::MissingParameter("subject"));
        }

        let last_received_on = non_empty(parameters.get_value("lastReceivedOn"))
            .map(|v| parse_fhir_date("lastReceivedOn", v, SpanEdge::Start))
            .transpose()?;

        Ok(Self {
            period_start,
            period_end,
            report_type,
            subject,
            practitioner: non_empty(parameters.get_value("practitioner"))
                .map(|p| normalize_reference("Practitioner", p.to_string())),
            last_received_on,
            product_line: non_empty(parameters.get_value("productLine")).map(str::to_string),
            additional_data: embedded_resource(parameters, "additionalData", "Bundle")?,
            terminology_endpoint: embedded_resource(parameters, "terminologyEndpoint", "Endpoint")?,
        })
    }

    /// The measurement period as a FHIR Period.
    pub fn period(&self) -> Period {
        Period {
            start: Some(self.period_start.to_string()),
            end: Some(self.period_end.to_string()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `Patient/<id>` or `Group/<id>`; a bare id is taken as a Patient.
fn subject_reference(value: &str) -> PluginResult<String> {
    match value.split_once('/') {
        None => Ok(normalize_reference("Patient", value.to_string())),
        Some(("Patient" | "Group", id)) if !id.is_empty() => Ok(value.to_string()),
        Some(_) => Err(PluginError::InvalidParameter {
            name: "subject",
            reason: format!("'{value}' is not a Patient or Group reference"),
        }),
    }
}

/// Which end of a partial date's span to resolve to.
#[derive(Clone, Copy)]
enum SpanEdge {
    Start,
    End,
}

fn required_date(
    parameters: &Parameters,
    name: &'static str,
    edge: SpanEdge,
) -> PluginResult<NaiveDate> {
    let value = non_empty(parameters.get_value(name)).ok_or(PluginError::MissingParameter(name))?;
    parse_fhir_date(name, value, edge)
}

/// Accepts a FHIR date (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`) or dateTime.
///
/// A partial date resolves to the first or last day of its span depending on `edge`; a dateTime
/// contributes its calendar date.
fn parse_fhir_date(name: &'static str, value: &str, edge: SpanEdge) -> PluginResult<NaiveDate> {
    let invalid = || PluginError::InvalidParameter {
        name,
        reason: format!("'{value}' is not a FHIR date"),
    };

    let (first, months) = match value.len() {
        4 if value.bytes().all(|b| b.is_ascii_digit()) => (
            NaiveDate::parse_from_str(&format!("{value}-01-01"), "%Y-%m-%d").ok(),
            12,
        ),
        7 if value.as_bytes()[4] == b'-' => (
            NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok(),
            1,
        ),
        _ => {
            return NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
                .map_err(|_| invalid());
        }
    };

    let first = first.ok_or_else(invalid)?;
    match edge {
        SpanEdge::Start => Ok(first),
        SpanEdge::End => first
            .checked_add_months(Months::new(months))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid),
    }
}

fn embedded_resource(
    parameters: &Parameters,
    name: &'static str,
    resource_type: &str,
) -> PluginResult<Option<Value>> {
    let Some(resource) = parameters.get_resource(name) else {
        return Ok(None);
    };

    let found = resource.get("resourceType").and_then(Value::as_str);
    if found != Some(resource_type) {
        return Err(PluginError::InvalidParameter {
            name,
            reason: format!(
                "expected a {resource_type}, got {}",
                found.unwrap_or("a resource without resourceType")
            ),
        });
    }

    Ok(Some(resource.clone()))
}
