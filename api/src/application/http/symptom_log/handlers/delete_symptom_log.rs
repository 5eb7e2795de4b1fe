use axum::{
    Extension,
    extract::{Path, State},
};
use gutlog_core::domain::{identity::Identity, symptom_log::ports::SymptomLogService};
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{
        api_error::{ApiError, ApiErrorResponse},
        response::Response,
    },
    app_state::AppState,
};

#[utoipa::path(
    delete,
    path = "/{log_id}",
    tag = "symptom-log",
    summary = "Delete a symptom log",
    params(
        ("log_id" = Uuid, Path, description = "Symptom log id"),
    ),
    responses(
        (status = 204, description = "Symptom log deleted"),
        (status = 404, body = ApiErrorResponse, description = "Symptom log not found")
    )
)]
pub async fn delete_symptom_log(
    Path(log_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<()>, ApiError> {
    state.service.delete_symptom_log(identity, log_id).await?;
    Ok(Response::NoContent)
}
