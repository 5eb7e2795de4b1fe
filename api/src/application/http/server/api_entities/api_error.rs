use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use gutlog_core::domain::common::entities::app_errors::{CoreError, FieldError, FieldErrors};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The model call or its reply failed.
    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    InternalServerError(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "E_BAD_REQUEST",
            ApiError::Unauthorized(_) => "E_UNAUTHORIZED",
            ApiError::Forbidden(_) => "E_FORBIDDEN",
            ApiError::NotFound(_) => "E_NOT_FOUND",
            ApiError::Validation(_) => "E_VALIDATION",
            ApiError::BadGateway(_) => "E_MODEL_UNAVAILABLE",
            ApiError::InternalServerError(_) => "E_INTERNAL_SERVER_ERROR",
        }
    }

    fn body(&self) -> ApiErrorResponse {
        let fields = match self {
            ApiError::Validation(fields) => fields.0.clone(),
            _ => Vec::new(),
        };

        ApiErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            status: self.status().as_u16(),
            fields,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            CoreError::Forbidden(message) => ApiError::Forbidden(message),
            CoreError::Invalid => ApiError::BadRequest("Invalid input".to_string()),
            CoreError::Validation(fields) => ApiError::Validation(fields),
            CoreError::ExternalServiceError(_) | CoreError::MalformedResponse(_) => {
                ApiError::BadGateway("The AI model could not complete the request".to_string())
            }
            CoreError::Template(message) => {
                error!("Prompt template error: {}", message);
                ApiError::InternalServerError("Internal server error".to_string())
            }
            CoreError::InternalServerError => {
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// `Json` extractor whose rejections use the [`ApiError`] body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(JsonBody(value))
    }
}

/// `Query` extractor whose rejections use the [`ApiError`] body.
#[derive(Debug, Clone)]
pub struct QueryArgs<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryArgs<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(QueryArgs(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::Request as HttpRequest, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn body_of(error: ApiError) -> (StatusCode, ApiErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let error = ApiError::from(CoreError::Validation(FieldErrors::single(
            "symptoms",
            "Please select at least one symptom.",
        )));

        let (status, body) = body_of(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "E_VALIDATION");
        assert_eq!(body.fields.len(), 1);
        assert_eq!(body.fields[0].field, "symptoms");
        assert_eq!(body.fields[0].message, "Please select at least one symptom.");
    }

    #[tokio::test]
    async fn test_model_failures_map_to_bad_gateway() {
        let (status, body) =
            body_of(ApiError::from(CoreError::MalformedResponse("no json".into()))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.status, 502);
        assert!(!body.message.contains("no json"));
        assert!(body.fields.is_empty());
    }

    #[test]
    fn test_core_error_status_mapping() {
        assert_eq!(
            ApiError::from(CoreError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(CoreError::Forbidden("no".into())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(CoreError::Template("bad tag".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(CoreError::ExternalServiceError("timeout".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[derive(Debug, Deserialize)]
    struct Window {
        limit: Option<u32>,
    }

    async fn window(QueryArgs(window): QueryArgs<Window>) -> String {
        format!("{:?}", window.limit)
    }

    #[tokio::test]
    async fn test_bad_query_string_gets_json_error() {
        let response = Router::new()
            .route("/timeline", get(window))
            .oneshot(
                HttpRequest::builder()
                    .uri("/timeline?limit=many")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "E_BAD_REQUEST");
        assert_eq!(body.status, 400);
    }
}
