use axum::{Router, middleware, routing::get};
use utoipa::OpenApi;

use super::handlers::{
    analyze_timeline::{__path_analyze_timeline, analyze_timeline},
    get_timeline::{__path_get_timeline, get_timeline},
};
use crate::application::{
    http::server::app_state::AppState, identity_middleware::identity_middleware,
};

#[derive(OpenApi)]
#[openapi(paths(get_timeline, analyze_timeline))]
pub struct TimelineApiDoc;

pub fn timeline_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(&format!("{}/timeline", root_path), get(get_timeline))
        .route(
            &format!("{}/timeline/insights", root_path),
            get(analyze_timeline),
        )
        .layer(middleware::from_fn(identity_middleware))
}
