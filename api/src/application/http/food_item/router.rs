use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use utoipa::OpenApi;

use super::handlers::{
    analyze_food_item::{__path_analyze_food_item, analyze_food_item},
    create_food_item::{__path_create_food_item, create_food_item},
    delete_food_item::{__path_delete_food_item, delete_food_item},
    get_food_item::{__path_get_food_item, get_food_item},
    get_food_items::{__path_get_food_items, get_food_items},
    set_food_feedback::{__path_set_food_feedback, set_food_feedback},
    update_food_item::{__path_update_food_item, update_food_item},
};
use crate::application::{
    http::server::app_state::AppState, identity_middleware::identity_middleware,
};

#[derive(OpenApi)]
#[openapi(paths(
    create_food_item,
    get_food_items,
    get_food_item,
    update_food_item,
    delete_food_item,
    set_food_feedback,
    analyze_food_item
))]
pub struct FoodItemApiDoc;

pub fn food_item_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{}/food-items", root_path),
            post(create_food_item).get(get_food_items),
        )
        .route(
            &format!("{}/food-items/{{item_id}}", root_path),
            get(get_food_item)
                .put(update_food_item)
                .delete(delete_food_item),
        )
        .route(
            &format!("{}/food-items/{{item_id}}/feedback", root_path),
            put(set_food_feedback),
        )
        .route(
            &format!("{}/food-items/{{item_id}}/analyze", root_path),
            post(analyze_food_item),
        )
        .layer(middleware::from_fn(identity_middleware))
}
