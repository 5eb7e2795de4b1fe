use axum::extract::State;
use gutlog_core::domain::flow::{
    flows::fodmap_detection::{DetectFodmapInput, DetectFodmapOutput},
    ports::FlowService,
};

use crate::application::http::server::{
    api_entities::{
        api_error::{ApiError, ApiErrorResponse, JsonBody},
        response::Response,
    },
    app_state::AppState,
};

#[utoipa::path(
    post,
    path = "/fodmap-detection",
    tag = "flow",
    summary = "Detect FODMAPs",
    description = "Rates a food and each of its ingredients on the FODMAP traffic light scale",
    request_body = DetectFodmapInput,
    responses(
        (status = 200, body = DetectFodmapOutput, description = "Rating of the food"),
        (status = 400, body = ApiErrorResponse, description = "Invalid input"),
        (status = 502, body = ApiErrorResponse, description = "The model call failed")
    )
)]
pub async fn detect_fodmap(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<DetectFodmapInput>,
) -> Result<Response<DetectFodmapOutput>, ApiError> {
    let output = state.service.detect_fodmap(input).await?;
    Ok(Response::OK(output))
}
