use axum::extract::State;
use gutlog_core::domain::flow::{
    flows::food_similarity::{CheckFoodSimilarityInput, CheckFoodSimilarityOutput},
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
    path = "/food-similarity",
    tag = "flow",
    summary = "Compare a food with safe foods",
    description = "Tells whether a food resembles one the user already tolerates. Answers `isSimilar = false` when the model is unavailable.",
    request_body = CheckFoodSimilarityInput,
    responses(
        (status = 200, body = CheckFoodSimilarityOutput, description = "Similarity verdict"),
        (status = 400, body = ApiErrorResponse, description = "Invalid input")
    )
)]
pub async fn check_food_similarity(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CheckFoodSimilarityInput>,
) -> Result<Response<CheckFoodSimilarityOutput>, ApiError> {
    let output = state.service.check_food_similarity(input).await?;
    Ok(Response::OK(output))
}
