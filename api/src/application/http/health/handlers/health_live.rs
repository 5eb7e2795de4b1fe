use axum::extract::State;
use gutlog_core::domain::health::ports::HealthCheckService;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{
        api_error::{ApiError, ApiErrorResponse},
        response::Response,
    },
    app_state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LivenessResponse {
    pub status: String,
    pub database_ms: u64,
}

#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    summary = "Liveness probe",
    responses(
        (status = 200, body = LivenessResponse),
        (status = 500, body = ApiErrorResponse, description = "Database unreachable")
    )
)]
pub async fn health_live(State(state): State<AppState>) -> Result<Response<LivenessResponse>, ApiError> {
    let database_ms = state.service.health().await?;

    Ok(Response::OK(LivenessResponse {
        status: "UP".to_string(),
        database_ms,
    }))
}
