use axum::extract::State;
use gutlog_core::domain::flow::{
    flows::food_image::{IdentifyFoodImageInput, IdentifyFoodImageOutput},
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
    path = "/food-image",
    tag = "flow",
    summary = "Identify a food photo",
    description = "Names the food on a photo sent as a base64 data URI and lists its likely ingredients and portion",
    request_body = IdentifyFoodImageInput,
    responses(
        (status = 200, body = IdentifyFoodImageOutput, description = "Identified food"),
        (status = 400, body = ApiErrorResponse, description = "Invalid or oversized photo"),
        (status = 502, body = ApiErrorResponse, description = "The model call failed")
    )
)]
pub async fn identify_food_image(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IdentifyFoodImageInput>,
) -> Result<Response<IdentifyFoodImageOutput>, ApiError> {
    let output = state.service.identify_food_image(input).await?;
    Ok(Response::OK(output))
}
