use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};
use gutlog_core::domain::flow::flows::food_image::MAX_PHOTO_BYTES;
use utoipa::OpenApi;

use super::handlers::{
    analyze_symptom_patterns::{__path_analyze_symptom_patterns, analyze_symptom_patterns},
    check_food_similarity::{__path_check_food_similarity, check_food_similarity},
    detect_fodmap::{__path_detect_fodmap, detect_fodmap},
    estimate_nutrition::{__path_estimate_nutrition, estimate_nutrition},
    identify_food_image::{__path_identify_food_image, identify_food_image},
    suggest_meal::{__path_suggest_meal, suggest_meal},
};
use crate::application::{
    http::server::app_state::AppState, identity_middleware::identity_middleware,
};

#[derive(OpenApi)]
#[openapi(paths(
    detect_fodmap,
    identify_food_image,
    estimate_nutrition,
    check_food_similarity,
    analyze_symptom_patterns,
    suggest_meal
))]
pub struct FlowApiDoc;

/// Request body cap for photo uploads. Leaves room for the base64 of a
/// photo somewhat above `MAX_PHOTO_BYTES` so the size check can answer it.
pub const FOOD_IMAGE_BODY_LIMIT: usize = 2 * MAX_PHOTO_BYTES;

pub fn flow_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{}/flows/fodmap-detection", root_path),
            post(detect_fodmap),
        )
        .route(
            &format!("{}/flows/food-image", root_path),
            post(identify_food_image).layer(DefaultBodyLimit::max(FOOD_IMAGE_BODY_LIMIT)),
        )
        .route(
            &format!("{}/flows/nutrition", root_path),
            post(estimate_nutrition),
        )
        .route(
            &format!("{}/flows/food-similarity", root_path),
            post(check_food_similarity),
        )
        .route(
            &format!("{}/flows/symptom-patterns", root_path),
            post(analyze_symptom_patterns),
        )
        .route(
            &format!("{}/flows/meal-suggestion", root_path),
            post(suggest_meal),
        )
        .layer(middleware::from_fn(identity_middleware))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use gutlog_core::domain::flow::{
        Flow,
        flows::food_image::{IdentifyFoodImage, IdentifyFoodImageInput},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::application::http::server::api_entities::api_error::{
        ApiError, ApiErrorResponse, JsonBody,
    };

    // Runs the local photo checks without calling the model.
    async fn check_photo(
        JsonBody(input): JsonBody<IdentifyFoodImageInput>,
    ) -> Result<StatusCode, ApiError> {
        IdentifyFoodImage.image(&input)?;
        Ok(StatusCode::OK)
    }

    fn app() -> Router {
        Router::new().route(
            "/flows/food-image",
            post(check_photo).layer(DefaultBodyLimit::max(FOOD_IMAGE_BODY_LIMIT)),
        )
    }

    async fn post_photo(decoded_bytes: usize) -> (StatusCode, Vec<u8>) {
        // "AAAA" decodes to three zero bytes
        let payload = "A".repeat(decoded_bytes / 3 * 4);
        let body = format!(r#"{{"photoDataUri":"data:image/jpeg;base64,{payload}"}}"#);

        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/flows/food-image")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_phone_sized_photo_passes_body_limit() {
        let (status, _) = post_photo(3 * 1024 * 1024).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_oversized_photo_reaches_size_check() {
        let (status, body) = post_photo(9 * 1024 * 1024).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: ApiErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.code, "E_VALIDATION");
        assert_eq!(body.fields[0].field, "photoDataUri");
        assert_eq!(body.fields[0].message, "photo must be 8 MB or smaller");
    }
}
