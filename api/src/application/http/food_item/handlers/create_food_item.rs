use axum::{Extension, extract::State};
use gutlog_core::domain::{
    food_log::{entities::LoggedFoodItem, ports::FoodLogService, value_objects::CreateFoodItemInput},
    identity::Identity,
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
    path = "",
    tag = "food-item",
    summary = "Log a food item",
    request_body = CreateFoodItemInput,
    responses(
        (status = 201, body = LoggedFoodItem, description = "Food item logged"),
        (status = 400, body = ApiErrorResponse, description = "Invalid input"),
        (status = 401, body = ApiErrorResponse, description = "Missing caller")
    )
)]
pub async fn create_food_item(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(input): JsonBody<CreateFoodItemInput>,
) -> Result<Response<LoggedFoodItem>, ApiError> {
    let item = state.service.create_food_item(identity, input).await?;
    Ok(Response::Created(item))
}
