use axum::extract::State;
use gutlog_core::domain::flow::{
    flows::symptom_patterns::{AnalyzeSymptomPatternsInput, AnalyzeSymptomPatternsOutput},
    ports::FlowService,
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
    path = "/symptom-patterns",
    tag = "flow",
    summary = "Analyze symptom patterns",
    description = "Looks for foods that tend to precede symptoms in the submitted logs",
    request_body = AnalyzeSymptomPatternsInput,
    responses(
        (status = 200, body = AnalyzeSymptomPatternsOutput, description = "Insights and potential triggers"),
        (status = 400, body = ApiErrorResponse, description = "Invalid input or empty symptom log")
    )
)]
pub async fn analyze_symptom_patterns(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<AnalyzeSymptomPatternsInput>,
) -> Result<Response<AnalyzeSymptomPatternsOutput>, ApiError> {
    let output = state.service.analyze_symptom_patterns(input).await?;
    Ok(Response::OK(output))
}
