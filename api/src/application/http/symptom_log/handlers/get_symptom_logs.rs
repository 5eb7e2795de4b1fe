use axum::{Extension, extract::State};
use gutlog_core::domain::{
    identity::Identity,
    symptom_log::{
        entities::SymptomLog, ports::SymptomLogService, value_objects::GetSymptomLogsFilter,
    },
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::{
    query_extractor::QueryParamsExtractor,
    query_params::{FilterOperator, QueryParams},
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

const SORTABLE_FIELDS: &[&str] = &["logged_at", "created_at", "severity"];

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetSymptomLogsResponse {
    pub items: Vec<SymptomLog>,
    pub offset: i64,
    pub limit: i64,
    pub count: usize,
}

/// Reads `filter[logged_at][gte|lte]`, `filter[severity][gte]` (or
/// `filter[min_severity]`), `sort`, `offset` and `limit`.
pub fn symptom_logs_filter(query_params: &QueryParams) -> GetSymptomLogsFilter {
    let mut filter = GetSymptomLogsFilter {
        offset: Some(query_params.offset()),
        limit: Some(query_params.limit()),
        sort: query_params
            .sort
            .to_sort_string(SORTABLE_FIELDS)
            .or_else(|| Some("-logged_at".to_string())),
        ..Default::default()
    };

    for cond in &query_params.filter.conditions {
        match (cond.field.as_str(), cond.operator) {
            ("logged_at", FilterOperator::Gte | FilterOperator::Gt) => {
                filter.logged_at_gte = cond.datetime();
            }
            ("logged_at", FilterOperator::Lte | FilterOperator::Lt) => {
                filter.logged_at_lte = cond.datetime();
            }
            ("severity", FilterOperator::Gte) | ("min_severity", FilterOperator::Eq) => {
                filter.min_severity = cond.value.trim().parse::<u8>().ok();
            }
            _ => {}
        }
    }

    filter
}

#[utoipa::path(
    get,
    path = "",
    tag = "symptom-log",
    summary = "List symptom logs",
    description = "Symptom logs of the caller, newest first by default. Free tier callers only see the last 7 days.",
    params(
        ("filter[logged_at][gte]" = Option<String>, Query, description = "Logged at or after (RFC 3339)"),
        ("filter[logged_at][lte]" = Option<String>, Query, description = "Logged at or before (RFC 3339)"),
        ("filter[severity][gte]" = Option<u8>, Query, description = "Minimum severity, 1 to 5"),
        ("sort" = Option<String>, Query, description = "e.g. -severity,logged_at"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, 20 by default, at most 100"),
    ),
    responses(
        (status = 200, body = GetSymptomLogsResponse),
        (status = 401, body = ApiErrorResponse, description = "Missing caller")
    )
)]
pub async fn get_symptom_logs(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    QueryParamsExtractor(query_params): QueryParamsExtractor,
) -> Result<Response<GetSymptomLogsResponse>, ApiError> {
    let filter = symptom_logs_filter(&query_params);
    let items = state.service.list_symptom_logs(identity, filter).await?;

    Ok(Response::OK(GetSymptomLogsResponse {
        count: items.len(),
        items,
        offset: query_params.pagination.offset,
        limit: query_params.pagination.limit,
    }))
}
