//! Request handlers.

use crate::{AppState, FHIR_JSON};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use fhir::Parameters;
use ruler_plugins::{cpg::create_error_outcome, PluginError};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: format!("ruler is alive (FHIR {})", state.cfg.fhir_version()),
    })
}

#[utoipa::path(
    get,
    path = "/fhir/metadata",
    responses(
        (status = 200, description = "CapabilityStatement", content_type = "application/fhir+json")
    )
)]
/// Minimal CapabilityStatement describing the configured release and the plugin operations.
#[axum::debug_handler]
pub async fn metadata(State(state): State<AppState>) -> Response {
    let version = state.cfg.fhir_version();
    let capability = serde_json::json!({
        "resourceType": "CapabilityStatement",
        "status": "active",
        "kind": "instance",
        "software": { "name": "ruler", "version": env!("CARGO_PKG_VERSION") },
        "fhirVersion": version.fhir_release(),
        "format": ["json"],
        "rest": [{
            "mode": "server",
            "operation": [
                { "name": "hello-world" },
                { "name": "evaluate-measure" }
            ]
        }]
    });
    fhir_json(StatusCode::OK, &capability)
}

#[utoipa::path(
    get,
    path = "/fhir/$hello-world",
    responses(
        (status = 200, description = "Informational OperationOutcome", content_type = "application/fhir+json")
    )
)]
/// `$hello-world`: returns the configured greeting as an informational OperationOutcome.
#[axum::debug_handler]
pub async fn hello_world(State(state): State<AppState>) -> Response {
    fhir_json(StatusCode::OK, &state.hello_world.hello_world())
}

#[utoipa::path(
    post,
    path = "/fhir/Measure/{id}/$evaluate-measure",
    params(("id" = String, Path, description = "Measure logical id")),
    request_body(
        content = String,
        content_type = "application/fhir+json",
        description = "Parameters resource"
    ),
    responses(
        (status = 200, description = "MeasureReport", content_type = "application/fhir+json"),
        (status = 400, description = "Invalid parameters (OperationOutcome)", content_type = "application/fhir+json"),
        (status = 500, description = "Evaluation failed (OperationOutcome)", content_type = "application/fhir+json"),
        (status = 501, description = "No evaluation engine configured (OperationOutcome)", content_type = "application/fhir+json")
    )
)]
/// `Measure/{id}/$evaluate-measure`
///
/// # Returns
/// * `200` with a MeasureReport on success
/// * `400` with an OperationOutcome if the body or parameters are invalid
/// * `501` with an OperationOutcome if no evaluation engine is configured
/// * `500` with an OperationOutcome if evaluation fails
#[axum::debug_handler]
pub async fn evaluate_measure(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Response {
    let parameters = match Parameters::parse(&body) {
        Ok(parameters) => parameters,
        Err(e) => {
            tracing::warn!("Evaluate measure rejected body: {e}");
            return fhir_json(
                StatusCode::BAD_REQUEST,
                &create_error_outcome(&e.to_string()),
            );
        }
    };

    match state.measure_evaluate.evaluate_measure(&id, &parameters) {
        Ok(report) => fhir_json(StatusCode::OK, &report),
        Err(e) => {
            let status = plugin_error_status(&e);
            if status.is_server_error() {
                tracing::error!("Evaluate measure error: {:?}", e);
            } else {
                tracing::warn!("Evaluate measure rejected request: {e}");
            }
            fhir_json(status, &e.to_outcome())
        }
    }
}

fn plugin_error_status(err: &PluginError) -> StatusCode {
    match err {
        PluginError::EvaluationUnavailable(_) => StatusCode::NOT_IMPLEMENTED,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Serialise `body` as FHIR JSON with `status`.
fn fhir_json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, FHIR_JSON)], bytes).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialise response: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}
