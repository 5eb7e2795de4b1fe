use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use gutlog_core::domain::identity::{Identity, RetentionTier};
use tracing::debug;
use uuid::Uuid;

use crate::application::http::server::api_entities::api_error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const RETENTION_TIER_HEADER: &str = "x-retention-tier";

/// Resolves the caller from the headers set by the upstream auth gateway.
fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, ApiError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

    let user_id = Uuid::parse_str(user_id.trim())
        .map_err(|_| ApiError::Unauthorized("X-User-Id must be a UUID".to_string()))?;

    // Unknown or absent tiers read as Free
    let retention_tier = headers
        .get(RETENTION_TIER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| RetentionTier::from(s.trim()))
        .unwrap_or_default();

    Ok(Identity::new(user_id, retention_tier))
}

/// Inserts the caller [`Identity`] into the request extensions.
pub async fn identity_middleware(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let identity = identity_from_headers(req.headers())?;
    debug!(user_id = %identity.user_id, tier = identity.retention_tier.as_str(), "caller resolved");

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    async fn whoami(Extension(identity): Extension<Identity>) -> String {
        format!("{}:{}", identity.user_id, identity.retention_tier.as_str())
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn(identity_middleware))
    }

    async fn call(headers: &[(&str, &str)]) -> (StatusCode, String) {
        let mut request = HttpRequest::builder().uri("/whoami");
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let (status, body) = call(&[]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("E_UNAUTHORIZED"));
    }

    #[tokio::test]
    async fn test_malformed_user_is_unauthorized() {
        let (status, _) = call(&[("X-User-Id", "not-a-uuid")]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_tier_defaults_to_free() {
        let user_id = Uuid::new_v4().to_string();

        let (status, body) = call(&[("X-User-Id", &user_id)]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("{user_id}:free"));

        let (_, body) = call(&[("X-User-Id", &user_id), ("X-Retention-Tier", "premium")]).await;
        assert_eq!(body, format!("{user_id}:premium"));
    }
}
