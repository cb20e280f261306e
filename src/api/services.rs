use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use super::{
    error::ApiError,
    models::{HealthResponse, ImportRequest},
    state::AppState,
    utils::{read_body, require_json},
    validation::validate_import_request,
};

/// Import endpoint (POST /api/import)
///
/// Decodes the request, then stages the preservation object, stages the
/// metadata document and applies the file set on the archival backend.
///
/// ## Responses:
/// - 200 with `{"importedFileSetId": ...}` once the apply phase succeeds
/// - 500 with the backend's error message when a phase is rejected, or the
///   outermost error message for anything unexpected (invalid base64,
///   backend unreachable)
/// - 400/413 when the body is not a well-formed JSON import request
pub async fn import(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    require_json(&headers)?;

    let limit = state.config.server.max_payload_bytes.as_usize();
    let body_bytes = read_body(body, limit).await?;

    let request: ImportRequest = serde_json::from_slice(&body_bytes)?;
    validate_import_request(&request).map_err(|err| ApiError::InvalidPayload(err.to_string()))?;

    let response = state.importer.import(request).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Health check endpoint (GET /health)
///
/// Reports the service version and import counters. The backend is not
/// probed: its availability only shows up as faults on real imports.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        imports: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(response))
}
