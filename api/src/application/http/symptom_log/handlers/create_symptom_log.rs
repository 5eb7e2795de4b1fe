use axum::{Extension, extract::State};
use gutlog_core::domain::{
    identity::Identity,
    symptom_log::{
        entities::SymptomLog, ports::SymptomLogService, value_objects::CreateSymptomLogInput,
    },
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
    tag = "symptom-log",
    summary = "Log symptoms",
    description = "At least one symptom is required. Linked food items must belong to the caller.",
    request_body = CreateSymptomLogInput,
    responses(
        (status = 201, body = SymptomLog, description = "Symptoms logged"),
        (status = 400, body = ApiErrorResponse, description = "Invalid input"),
        (status = 401, body = ApiErrorResponse, description = "Missing caller")
    )
)]
pub async fn create_symptom_log(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(input): JsonBody<CreateSymptomLogInput>,
) -> Result<Response<SymptomLog>, ApiError> {
    let log = state.service.create_symptom_log(identity, input).await?;
    Ok(Response::Created(log))
}
