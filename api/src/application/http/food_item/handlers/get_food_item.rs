use axum::{
    Extension,
    extract::{Path, State},
};
use gutlog_core::domain::{
    food_log::{entities::LoggedFoodItem, ports::FoodLogService},
    identity::Identity,
};
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{
        api_error::{ApiError, ApiErrorResponse},
        response::Response,
    },
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/{item_id}",
    tag = "food-item",
    summary = "Get a food item",
    params(
        ("item_id" = Uuid, Path, description = "Food item id"),
    ),
    responses(
        (status = 200, body = LoggedFoodItem),
        (status = 404, body = ApiErrorResponse, description = "Food item not found")
    )
)]
pub async fn get_food_item(
    Path(item_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<LoggedFoodItem>, ApiError> {
    let item = state.service.get_food_item(identity, item_id).await?;
    Ok(Response::OK(item))
}
