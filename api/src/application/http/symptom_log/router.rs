use axum::{
    Router, middleware,
    routing::{get, post},
};
use utoipa::OpenApi;

use super::handlers::{
    create_symptom_log::{__path_create_symptom_log, create_symptom_log},
    delete_symptom_log::{__path_delete_symptom_log, delete_symptom_log},
    get_symptom_log::{__path_get_symptom_log, get_symptom_log},
    get_symptom_logs::{__path_get_symptom_logs, get_symptom_logs},
    update_symptom_log::{__path_update_symptom_log, update_symptom_log},
};
use crate::application::{
    http::server::app_state::AppState, identity_middleware::identity_middleware,
};

#[derive(OpenApi)]
#[openapi(paths(
    create_symptom_log,
    get_symptom_logs,
    get_symptom_log,
    update_symptom_log,
    delete_symptom_log
))]
pub struct SymptomLogApiDoc;

pub fn symptom_log_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{}/symptom-logs", root_path),
            post(create_symptom_log).get(get_symptom_logs),
        )
        .route(
            &format!("{}/symptom-logs/{{log_id}}", root_path),
            get(get_symptom_log)
                .put(update_symptom_log)
                .delete(delete_symptom_log),
        )
        .layer(middleware::from_fn(identity_middleware))
}
