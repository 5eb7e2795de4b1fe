use axum::extract::State;
use gutlog_core::domain::flow::{
    flows::nutrition::{EstimateNutritionInput, EstimateNutritionOutput},
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
    path = "/nutrition",
    tag = "flow",
    summary = "Estimate nutrition",
    request_body = EstimateNutritionInput,
    responses(
        (status = 200, body = EstimateNutritionOutput, description = "Estimated macros for the portion"),
        (status = 400, body = ApiErrorResponse, description = "Invalid input"),
        (status = 502, body = ApiErrorResponse, description = "The model call failed")
    )
)]
pub async fn estimate_nutrition(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<EstimateNutritionInput>,
) -> Result<Response<EstimateNutritionOutput>, ApiError> {
    let output = state.service.estimate_nutrition(input).await?;
    Ok(Response::OK(output))
}
