use axum::{Extension, extract::State};
use gutlog_core::domain::{
    flow::flows::fodmap_detection::FodmapRisk,
    food_log::{
        entities::{LoggedFoodItem, SafetyFeedback},
        ports::FoodLogService,
        value_objects::GetFoodItemsFilter,
    },
    identity::Identity,
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

const SORTABLE_FIELDS: &[&str] = &["logged_at", "created_at", "name", "overall_risk"];

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetFoodItemsResponse {
    pub items: Vec<LoggedFoodItem>,
    pub offset: i64,
    pub limit: i64,
    pub count: usize,
}

/// Reads `filter[logged_at][gte|lte]`, `filter[overall_risk]`,
/// `filter[user_feedback]`, `sort`, `offset` and `limit`. Unknown fields and
/// unparsable values are ignored.
pub fn food_items_filter(query_params: &QueryParams) -> GetFoodItemsFilter {
    let mut filter = GetFoodItemsFilter {
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
            ("overall_risk", FilterOperator::Eq) => {
                filter.overall_risk = FodmapRisk::parse(&cond.value);
            }
            ("user_feedback", FilterOperator::Eq) => {
                filter.user_feedback = SafetyFeedback::parse(&cond.value);
            }
            _ => {}
        }
    }

    filter
}

#[utoipa::path(
    get,
    path = "",
    tag = "food-item",
    summary = "List food items",
    description = "Food items of the caller, newest first by default. Free tier callers only see the last 7 days.",
    params(
        ("filter[logged_at][gte]" = Option<String>, Query, description = "Logged at or after (RFC 3339)"),
        ("filter[logged_at][lte]" = Option<String>, Query, description = "Logged at or before (RFC 3339)"),
        ("filter[overall_risk]" = Option<String>, Query, description = "Green, Yellow or Red"),
        ("filter[user_feedback]" = Option<String>, Query, description = "Safe or Unsafe"),
        ("sort" = Option<String>, Query, description = "e.g. -logged_at,name"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, 20 by default, at most 100"),
    ),
    responses(
        (status = 200, body = GetFoodItemsResponse),
        (status = 401, body = ApiErrorResponse, description = "Missing caller")
    )
)]
pub async fn get_food_items(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    QueryParamsExtractor(query_params): QueryParamsExtractor,
) -> Result<Response<GetFoodItemsResponse>, ApiError> {
    let filter = food_items_filter(&query_params);
    let items = state.service.list_food_items(identity, filter).await?;

    Ok(Response::OK(GetFoodItemsResponse {
        count: items.len(),
        items,
        offset: query_params.pagination.offset,
        limit: query_params.pagination.limit,
    }))
}
