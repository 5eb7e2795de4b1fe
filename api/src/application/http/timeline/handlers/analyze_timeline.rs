use axum::{Extension, extract::State};
use gutlog_core::domain::{
    flow::flows::symptom_patterns::AnalyzeSymptomPatternsOutput,
    identity::Identity,
    timeline::{ports::TimelineService, value_objects::GetTimelineFilter},
};

use crate::application::http::server::{
    api_entities::{
        api_error::{ApiError, ApiErrorResponse, QueryArgs},
        response::Response,
    },
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/insights",
    tag = "timeline",
    summary = "Analyze the stored timeline",
    description = "Runs symptom pattern analysis over the caller's stored food and symptom logs in the requested window",
    params(GetTimelineFilter),
    responses(
        (status = 200, body = AnalyzeSymptomPatternsOutput),
        (status = 400, body = ApiErrorResponse, description = "No symptom logged in the window")
    )
)]
pub async fn analyze_timeline(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    QueryArgs(filter): QueryArgs<GetTimelineFilter>,
) -> Result<Response<AnalyzeSymptomPatternsOutput>, ApiError> {
    let output = state.service.analyze_timeline(identity, filter).await?;
    Ok(Response::OK(output))
}
