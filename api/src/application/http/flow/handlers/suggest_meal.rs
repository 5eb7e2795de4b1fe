use axum::extract::State;
use gutlog_core::domain::flow::{
    flows::meal_suggestion::{SuggestMealInput, SuggestMealOutput},
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
    path = "/meal-suggestion",
    tag = "flow",
    summary = "Suggest a meal",
    request_body = SuggestMealInput,
    responses(
        (status = 200, body = SuggestMealOutput, description = "Suggested meal"),
        (status = 400, body = ApiErrorResponse, description = "Invalid input")
    )
)]
pub async fn suggest_meal(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SuggestMealInput>,
) -> Result<Response<SuggestMealOutput>, ApiError> {
    let output = state.service.suggest_meal(input).await?;
    Ok(Response::OK(output))
}
