use axum::{
    Extension,
    extract::{Path, State},
};
use gutlog_core::domain::{
    food_log::{entities::LoggedFoodItem, ports::FoodLogService, value_objects::SetFoodFeedbackInput},
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
    path = "/{item_id}/feedback",
    tag = "food-item",
    summary = "Record whether a food was tolerated",
    params(
        ("item_id" = Uuid, Path, description = "Food item id"),
    ),
    request_body = SetFoodFeedbackInput,
    responses(
        (status = 200, body = LoggedFoodItem),
        (status = 404, body = ApiErrorResponse, description = "Food item not found")
    )
)]
pub async fn set_food_feedback(
    Path(item_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(input): JsonBody<SetFoodFeedbackInput>,
) -> Result<Response<LoggedFoodItem>, ApiError> {
    let item = state
        .service
        .set_food_feedback(identity, item_id, input)
        .await?;
    Ok(Response::OK(item))
}
