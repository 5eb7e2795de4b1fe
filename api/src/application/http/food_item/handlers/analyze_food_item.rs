use axum::{
    Extension,
    extract::{Path, State},
};
use gutlog_core::domain::{
    food_log::{
        entities::LoggedFoodItem, ports::FoodLogService, value_objects::AnalyzeFoodItemInput,
    },
    identity::Identity,
};
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{
        api_error::{ApiError, ApiErrorResponse, JsonBody},
        response::Response,
    },
    app_state::AppState,
};

#[utoipa::path(
    post,
    path = "/{item_id}/analyze",
    tag = "food-item",
    summary = "Analyze a food item",
    description = "Runs FODMAP detection and nutrition estimation on the stored item and saves the results on it",
    params(
        ("item_id" = Uuid, Path, description = "Food item id"),
    ),
    request_body = AnalyzeFoodItemInput,
    responses(
        (status = 200, body = LoggedFoodItem, description = "Item with fresh annotations"),
        (status = 404, body = ApiErrorResponse, description = "Food item not found"),
        (status = 502, body = ApiErrorResponse, description = "FODMAP detection failed")
    )
)]
pub async fn analyze_food_item(
    Path(item_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(input): JsonBody<AnalyzeFoodItemInput>,
) -> Result<Response<LoggedFoodItem>, ApiError> {
    let item = state
        .service
        .analyze_food_item(identity, item_id, input)
        .await?;
    Ok(Response::OK(item))
}
