//! # API REST
//!
//! REST API implementation for the ruler.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI documentation (utoipa, served by Swagger UI)
//! - FHIR JSON responses (`application/fhir+json`)
//! - REST-specific concerns (status codes, CORS, request tracing)
//!
//! Operation logic lives in `ruler-plugins`; this crate only maps HTTP onto it.

#![warn(rust_2018_idioms)]

mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use ruler_core::RulerConfig;
use ruler_plugins::{HelloWorldProvider, MeasureEvaluateProvider, MeasureEvaluator};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Media type of FHIR JSON bodies.
pub const FHIR_JSON: &str = "application/fhir+json";

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<RulerConfig>,
    hello_world: HelloWorldProvider,
    measure_evaluate: MeasureEvaluateProvider,
}

impl AppState {
    /// Wire the plugin providers from configuration and a measure evaluator.
    pub fn new(cfg: Arc<RulerConfig>, evaluator: Arc<dyn MeasureEvaluator>) -> Self {
        Self {
            hello_world: HelloWorldProvider::new(cfg.hello_world().clone()),
            measure_evaluate: MeasureEvaluateProvider::new(evaluator),
            cfg,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::metadata,
        handlers::hello_world,
        handlers::evaluate_measure,
    ),
    components(schemas(handlers::HealthRes))
)]
pub struct ApiDoc;

/// Build the REST router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/fhir/metadata", get(handlers::metadata))
        .route(
            "/fhir/$hello-world",
            get(handlers::hello_world).post(handlers::hello_world),
        )
        .route(
            "/fhir/Measure/:id/$evaluate-measure",
            post(handlers::evaluate_measure),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use fhir::measure_report::{MeasureReportType, population};
    use fhir::{MeasureReport, OperationOutcome, Period};
    use http_body_util::BodyExt;
    use ruler_core::{FhirVersion, HelloWorldProperties};
    use ruler_plugins::cr::UnavailableEvaluator;
    use ruler_plugins::{EvaluateMeasureParameters, PluginResult};
    use tower::ServiceExt;

    struct CountingEvaluator;

    impl MeasureEvaluator for CountingEvaluator {
        fn evaluate(
            &self,
            measure_id: &str,
            parameters: &EvaluateMeasureParameters,
        ) -> PluginResult<MeasureReport> {
            let mut report = MeasureReport::new(
                format!("Measure/{measure_id}"),
                parameters.report_type.measure_report_type(),
                Period::default(),
            );
            report.group.push(fhir::measure_report::MeasureReportGroup {
                code: None,
                population: vec![fhir::measure_report::MeasureReportPopulation {
                    code: fhir::CodeableConcept::from_coding(fhir::Coding::new(
                        "http://terminology.hl7.org/CodeSystem/measure-population",
                        population::INITIAL_POPULATION,
                        None,
                    )),
                    count: 1,
                }],
            });
            Ok(report)
        }
    }

    fn app(evaluator: Arc<dyn MeasureEvaluator>) -> Router {
        let cfg = RulerConfig::new(
            FhirVersion::R4,
            "127.0.0.1:0".into(),
            HelloWorldProperties {
                message: "Hello from config".into(),
            },
        )
        .expect("config");
        router(AppState::new(Arc::new(cfg), evaluator))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    const EVALUATE_BODY: &str = r#"{
      "resourceType": "Parameters",
      "parameter": [
        { "name": "periodStart", "valueString": "2019-01-01" },
        { "name": "periodEnd", "valueString": "2020-01-01" },
        { "name": "reportType", "valueString": "individual" },
        { "name": "subject", "valueString": "Patient/numer-EXM104" }
      ]
    }"#;

    #[tokio::test]
    async fn health_is_ok() {
        let response = app(Arc::new(UnavailableEvaluator))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn openapi_document_lists_operations() {
        let response = app(Arc::new(UnavailableEvaluator))
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let paths = json["paths"].as_object().expect("paths object");
        assert!(paths.contains_key("/fhir/$hello-world"));
        assert!(paths.contains_key("/fhir/Measure/{id}/$evaluate-measure"));
    }

    #[tokio::test]
    async fn hello_world_returns_configured_message() {
        let response = app(Arc::new(UnavailableEvaluator))
            .oneshot(Request::get("/fhir/$hello-world").body(Body::empty()).unwrap())
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], FHIR_JSON);
        let outcome: OperationOutcome =
            serde_json::from_value(body_json(response).await).expect("outcome");
        assert_eq!(
            outcome.issue[0].details.as_ref().and_then(|d| d.text.as_deref()),
            Some("Hello from config")
        );
    }

    #[tokio::test]
    async fn metadata_reports_configured_release() {
        let response = app(Arc::new(UnavailableEvaluator))
            .oneshot(Request::get("/fhir/metadata").body(Body::empty()).unwrap())
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["resourceType"], "CapabilityStatement");
        assert_eq!(json["fhirVersion"], "4.0.1");
    }

    #[tokio::test]
    async fn evaluate_measure_returns_report() {
        let response = app(Arc::new(CountingEvaluator))
            .oneshot(
                Request::post("/fhir/Measure/measure-EXM104-8.2.000/$evaluate-measure")
                    .header(header::CONTENT_TYPE, FHIR_JSON)
                    .body(Body::from(EVALUATE_BODY))
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let report: MeasureReport =
            serde_json::from_value(body_json(response).await).expect("report");
        assert_eq!(report.measure, "Measure/measure-EXM104-8.2.000");
        assert_eq!(report.type_, MeasureReportType::Individual);
        assert_eq!(
            report
                .group_first_rep()
                .and_then(|g| g.population_count(population::INITIAL_POPULATION)),
            Some(1)
        );
    }

    #[tokio::test]
    async fn evaluate_measure_rejects_bad_parameters() {
        let response = app(Arc::new(CountingEvaluator))
            .oneshot(
                Request::post("/fhir/Measure/m1/$evaluate-measure")
                    .body(Body::from(r#"{"resourceType":"Parameters"}"#))
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let outcome: OperationOutcome =
            serde_json::from_value(body_json(response).await).expect("outcome");
        assert!(outcome.has_errors());
    }

    #[tokio::test]
    async fn evaluate_measure_rejects_malformed_json() {
        let response = app(Arc::new(CountingEvaluator))
            .oneshot(
                Request::post("/fhir/Measure/m1/$evaluate-measure")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn evaluate_measure_without_engine_is_not_implemented() {
        let response = app(Arc::new(UnavailableEvaluator))
            .oneshot(
                Request::post("/fhir/Measure/m1/$evaluate-measure")
                    .body(Body::from(EVALUATE_BODY))
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
