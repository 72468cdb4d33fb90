//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use super::AppState;
use super::types::{ErrorResponse, MockDataRequest, StatusRequest};
use crate::error::SolterraError;
use crate::estimator::{EstimateRequest, EstimateResponse};
use crate::runner::MockDataSummary;
use crate::status::SystemStatus;

/// Maps crate errors onto HTTP status codes.
pub struct ApiError(SolterraError);

impl From<SolterraError> for ApiError {
    fn from(err: SolterraError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(SolterraError::invalid("body", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SolterraError::NotFound(_) => StatusCode::NOT_FOUND,
            err if err.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// `GET /health` → 200 `ok`
pub async fn health() -> &'static str {
    "ok"
}

/// `POST /calculate-savings` → 200 + `EstimateResponse` JSON, 400 on bad input.
pub async fn calculate_savings(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let Json(request) = payload?;
    let mut store = state.store()?;
    let response = state.runner.calculate_savings(&request, &mut *store)?;
    tracing::debug!(
        roof_type = %request.roof_type,
        system_size_kw = response.system_size,
        "savings calculated"
    );
    Ok(Json(response))
}

/// `POST /generate-mock-data` → 200 + `MockDataSummary` JSON.
pub async fn generate_mock_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MockDataRequest>, JsonRejection>,
) -> Result<Json<MockDataSummary>, ApiError> {
    let Json(request) = payload?;
    let mut rng = state.rng();
    let mut store = state.store()?;
    let summary = state.runner.seed_mock_data(
        &state.registry,
        &mut *store,
        &request.system_id,
        request.days,
        Utc::now(),
        &mut rng,
    )?;
    tracing::info!(system_id = %request.system_id, count = summary.count, "mock data generated");
    Ok(Json(summary))
}

/// `POST /system-status` → 200 + `SystemStatus` JSON, 404 for unknown systems.
pub async fn system_status(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<SystemStatus>, ApiError> {
    let Json(request) = payload?;
    let mut rng = state.rng();
    let store = state.store()?;
    let status = state.runner.system_status(
        &state.registry,
        &store,
        &request.system_id,
        Utc::now(),
        &mut rng,
    )?;
    Ok(Json(status))
}
