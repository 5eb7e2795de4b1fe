use axum::{Extension, extract::State};
use gutlog_core::domain::{
    identity::Identity,
    timeline::{entities::TimelineEntry, ports::TimelineService, value_objects::GetTimelineFilter},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{
        api_error::{ApiError, ApiErrorResponse, QueryArgs},
        response::Response,
    },
    app_state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetTimelineResponse {
    pub entries: Vec<TimelineEntry>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "",
    tag = "timeline",
    summary = "Get the food and symptom timeline",
    description = "Food items and symptom logs of the caller merged newest first. Free tier callers only see the last 7 days.",
    params(GetTimelineFilter),
    responses(
        (status = 200, body = GetTimelineResponse),
        (status = 400, body = ApiErrorResponse, description = "Malformed query string"),
        (status = 401, body = ApiErrorResponse, description = "Missing caller")
    )
)]
pub async fn get_timeline(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    QueryArgs(filter): QueryArgs<GetTimelineFilter>,
) -> Result<Response<GetTimelineResponse>, ApiError> {
    let entries = state.service.get_timeline(identity, filter).await?;

    Ok(Response::OK(GetTimelineResponse {
        count: entries.len(),
        entries,
    }))
}
