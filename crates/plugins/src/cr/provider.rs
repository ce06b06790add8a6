//! `$evaluate-measure` provider.

use super::{EvaluateMeasureParameters, MeasureEvaluator};
use crate::{PluginError, PluginResult};
use chrono::{SecondsFormat, Utc};
use fhir::{MeasureReport, Parameters, Reference};
use std::sync::Arc;

/// Validates `$evaluate-measure` requests and runs them through a [`MeasureEvaluator`].
#[derive(Clone)]
pub struct MeasureEvaluateProvider {
    evaluator: Arc<dyn MeasureEvaluator>,
}

impl MeasureEvaluateProvider {
    pub fn new(evaluator: Arc<dyn MeasureEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Evaluate `Measure/<measure_id>` with the operation's Parameters.
    ///
    /// Report fields the evaluator leaves empty (period, subject, date) are filled in from the
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] if the parameters are invalid, the evaluator fails, or the
    /// returned report is for a different measure.
    pub fn evaluate_measure(
        &self,
        measure_id: &str,
        parameters: &Parameters,
    ) -> PluginResult<MeasureReport> {
        if measure_id.trim().is_empty() {
            return Err(PluginError::MissingParameter("id"));
        }

        let params = EvaluateMeasureParameters::from_parameters(parameters)?;
        tracing::info!(
            measure_id,
            report_type = ?params.report_type,
            subject = params.subject.as_deref().unwrap_or("-"),
            "$evaluate-measure"
        );

        let mut report = self.evaluator.evaluate(measure_id, &params)?;

        let measure_ref = format!("Measure/{measure_id}");
        let measure_matches = report.measure == measure_ref
            || report.measure == measure_id
            || report.measure.ends_with(&format!("/{measure_ref}"));
        if !measure_matches {
            return Err(PluginError::Evaluation(format!(
                "evaluator returned a report for '{}' instead of {measure_ref}",
                report.measure
            )));
        }

        if report.period.start.is_none() && report.period.end.is_none() {
            report.period = params.period();
        }
        if report.subject.is_none() {
            report.subject = Reference::from_literal(params.subject.as_deref());
        }
        if report.date.is_none() {
            report.date = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cr::UnavailableEvaluator;
    use fhir::measure_report::{
        population, MeasureReportGroup, MeasureReportPopulation, MeasureReportType,
    };
    use fhir::{CodeableConcept, Coding, Period};
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns canned population counts per subject and records what it was asked.
    #[derive(Default)]
    struct StubEvaluator {
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    fn pop(code: &str, count: i64) -> MeasureReportPopulation {
        MeasureReportPopulation {
            code: CodeableConcept::from_coding(Coding::new(
                "http://terminology.hl7.org/CodeSystem/measure-population",
                code,
                None,
            )),
            count,
        }
    }

    impl MeasureEvaluator for StubEvaluator {
        fn evaluate(
            &self,
            measure_id: &str,
            parameters: &EvaluateMeasureParameters,
        ) -> PluginResult<MeasureReport> {
            self.calls
                .lock()
                .unwrap()
                .push((measure_id.to_string(), parameters.subject.clone()));

            let in_numerator = parameters.subject.as_deref() == Some("Patient/numer-EXM104");
            let mut report = MeasureReport::new(
                format!("Measure/{measure_id}"),
                parameters.report_type.measure_report_type(),
                Period::default(),
            );
            report.group.push(MeasureReportGroup {
                code: None,
                population: vec![
                    pop(population::INITIAL_POPULATION, 1),
                    pop(population::DENOMINATOR, 1),
                    pop(population::DENOMINATOR_EXCLUSION, 0),
                    pop(population::NUMERATOR, i64::from(in_numerator)),
                ],
            });
            report.contained.push(json!({
                "resourceType": "Observation",
                "code": { "text": "Enrolled During Participation Period" },
                "valueCodeableConcept": { "coding": [{ "code": "true" }] }
            }));
            Ok(report)
        }
    }

    fn request(subject: &str) -> Parameters {
        Parameters::new()
            .add_string("periodStart", "2019-01-01")
            .add_string("periodEnd", "2020-01-01")
            .add_string("reportType", "individual")
            .add_string("subject", subject)
            .add_string("lastReceivedOn", "2019-12-12")
    }

    #[test]
    fn evaluates_individual_report() {
        let stub = Arc::new(StubEvaluator::default());
        let provider = MeasureEvaluateProvider::new(stub.clone());

        let report = provider
            .evaluate_measure("measure-EXM104-8.2.000", &request("Patient/numer-EXM104"))
            .expect("evaluate");

        assert_eq!(report.type_, MeasureReportType::Individual);
        let group = report.group_first_rep().expect("group");
        assert_eq!(group.population_count(population::INITIAL_POPULATION), Some(1));
        assert_eq!(group.population_count(population::DENOMINATOR), Some(1));
        assert_eq!(group.population_count(population::DENOMINATOR_EXCLUSION), Some(0));
        assert_eq!(group.population_count(population::NUMERATOR), Some(1));
        assert!(report
            .contained_observation("Enrolled During Participation Period")
            .is_some());

        // Filled in from the request.
        assert_eq!(report.period.start.as_deref(), Some("2019-01-01"));
        assert_eq!(
            report.subject.and_then(|s| s.reference).as_deref(),
            Some("Patient/numer-EXM104")
        );
        assert!(report.date.is_some());

        let calls = stub.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            &[(
                "measure-EXM104-8.2.000".to_string(),
                Some("Patient/numer-EXM104".to_string())
            )]
        );
    }

    #[test]
    fn denominator_only_patient() {
        let provider = MeasureEvaluateProvider::new(Arc::new(StubEvaluator::default()));
        let report = provider
            .evaluate_measure("measure-EXM104-8.2.000", &request("denom-EXM104"))
            .expect("evaluate");

        let group = report.group_first_rep().expect("group");
        assert_eq!(group.population_count(population::NUMERATOR), Some(0));
    }

    #[test]
    fn invalid_parameters_never_reach_evaluator() {
        let stub = Arc::new(StubEvaluator::default());
        let provider = MeasureEvaluateProvider::new(stub.clone());

        let err = provider
            .evaluate_measure("m1", &Parameters::new().add_string("periodStart", "2019-01-01"))
            .expect_err("periodEnd missing");
        assert!(err.is_client_error());
        assert!(stub.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn unavailable_engine_is_a_server_error() {
        let provider = MeasureEvaluateProvider::new(Arc::new(UnavailableEvaluator));
        let err = provider
            .evaluate_measure("m1", &request("p1"))
            .expect_err("no engine");

        assert!(matches!(err, PluginError::EvaluationUnavailable(_)));
        assert!(!err.is_client_error());
        let outcome = err.to_outcome();
        assert!(outcome.has_errors());
    }

    #[test]
    fn rejects_report_for_another_measure() {
        struct WrongMeasure;
        impl MeasureEvaluator for WrongMeasure {
            fn evaluate(
                &self,
                _measure_id: &str,
                _parameters: &EvaluateMeasureParameters,
            ) -> PluginResult<MeasureReport> {
                Ok(MeasureReport::new(
                    "Measure/other",
                    MeasureReportType::Summary,
                    Period::default(),
                ))
            }
        }

        let provider = MeasureEvaluateProvider::new(Arc::new(WrongMeasure));
        let err = provider
            .evaluate_measure("m1", &request("p1"))
            .expect_err("mismatched measure");
        assert!(matches!(err, PluginError::Evaluation(_)));
    }

    #[test]
    fn blank_measure_id_is_rejected() {
        let provider = MeasureEvaluateProvider::new(Arc::new(StubEvaluator::default()));
        let err = provider
            .evaluate_measure(" ", &request("p1"))
            .expect_err("blank id");
        assert!(matches!(err, PluginError::MissingParameter("id")));
    }
}
