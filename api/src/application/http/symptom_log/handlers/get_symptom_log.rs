use axum::{
    Extension,
    extract::{Path, State},
};
use gutlog_core::domain::{
    identity::Identity,
    symptom_log::{entities::SymptomLog, ports::SymptomLogService},
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
    path = "/{log_id}",
    tag = "symptom-log",
    summary = "Get a symptom log",
    params(
        ("log_id" = Uuid, Path, description = "Symptom log id"),
    ),
    responses(
        (status = 200, body = SymptomLog),
        (status = 404, body = ApiErrorResponse, description = "Symptom log not found")
    )
)]
pub async fn get_symptom_log(
    Path(log_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<SymptomLog>, ApiError> {
    let log = state.service.get_symptom_log(identity, log_id).await?;
    Ok(Response::OK(log))
}
