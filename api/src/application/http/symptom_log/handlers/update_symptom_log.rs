use axum::{
    Extension,
    extract::{Path, State},
};
use gutlog_core::domain::{
    identity::Identity,
    symptom_log::{
        entities::SymptomLog, ports::SymptomLogService, value_objects::UpdateSymptomLogInput,
    },
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
    path = "/{log_id}",
    tag = "symptom-log",
    summary = "Update a symptom log",
    params(
        ("log_id" = Uuid, Path, description = "Symptom log id"),
    ),
    request_body = UpdateSymptomLogInput,
    responses(
        (status = 200, body = SymptomLog),
        (status = 400, body = ApiErrorResponse, description = "Invalid input"),
        (status = 404, body = ApiErrorResponse, description = "Symptom log not found")
    )
)]
pub async fn update_symptom_log(
    Path(log_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(input): JsonBody<UpdateSymptomLogInput>,
) -> Result<Response<SymptomLog>, ApiError> {
    let log = state
        .service
        .update_symptom_log(identity, log_id, input)
        .await?;
    Ok(Response::OK(log))
}
