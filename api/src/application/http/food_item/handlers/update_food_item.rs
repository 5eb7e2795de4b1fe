use axum::{
    Extension,
    extract::{Path, State},
};
use gutlog_core::domain::{
    food_log::{entities::LoggedFoodItem, ports::FoodLogService, value_objects::UpdateFoodItemInput},
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
    put,
    path = "/{item_id}",
    tag = "food-item",
    summary = "Update a food item",
    description = "Partial update. Changing the name, ingredients or portion drops the AI annotations.",
    params(
        ("item_id" = Uuid, Path, description = "Food item id"),
    ),
    request_body = UpdateFoodItemInput,
    responses(
        (status = 200, body = LoggedFoodItem),
        (status = 400, body = ApiErrorResponse, description = "Invalid input"),
        (status = 404, body = ApiErrorResponse, description = "Food item not found")
    )
)]
pub async fn update_food_item(
    Path(item_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(input): JsonBody<UpdateFoodItemInput>,
) -> Result<Response<LoggedFoodItem>, ApiError> {
    let item = state
        .service
        .update_food_item(identity, item_id, input)
        .await?;
    Ok(Response::OK(item))
}
