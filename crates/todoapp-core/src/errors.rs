//! Application error type.
//!
//! Every error that reaches the HTTP boundary is rendered as
//! `{"detail": <message>}` with the matching status code. Server errors never
//! leak their message: the body carries [`INTERNAL_ERROR_DETAIL`] and the real
//! error travels in an [`UnhandledError`] response extension, where the request
//! observability middleware picks it up for logging, tracing and metrics.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Body detail used for every 5xx response.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal Server Error";

/// Marker attached to responses produced from server-side failures.
#[derive(Debug, Clone)]
pub struct UnhandledError {
    /// Name of the error type that caused the failure.
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub kind: &'static str,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            kind: std::any::type_name::<E>(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message.into()))
    }

    /// The message a client will see for this error.
    pub fn detail(&self) -> String {
        if self.status.is_server_error() {
            INTERNAL_ERROR_DETAIL.to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail() }));
        let mut response = (self.status, body).into_response();

        if self.status.is_server_error() {
            response.extensions_mut().insert(UnhandledError {
                kind: self.kind,
                message: format!("{:#}", self.error),
            });
        }

        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_renders_detail() {
        let response = AppError::not_found(anyhow::anyhow!("Todo not found.")).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<UnhandledError>().is_none());
        assert_eq!(
            body_json(response).await,
            json!({ "detail": "Todo not found." })
        );
    }

    #[tokio::test]
    async fn test_unauthorized_renders_detail() {
        let response = AppError::unauthorized("Could not validate user.").into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "detail": "Could not validate user." })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let err = std::io::Error::other("connection reset by peer");
        let response = AppError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let marker = response
            .extensions()
            .get::<UnhandledError>()
            .cloned()
            .expect("server errors carry a marker");
        assert_eq!(marker.kind, "std::io::error::Error");
        assert!(marker.message.contains("connection reset by peer"));

        let body = body_json(response).await;
        assert_eq!(body, json!({ "detail": INTERNAL_ERROR_DETAIL }));
    }

    #[test]
    fn test_forbidden_status() {
        let err = AppError::forbidden("Admin privileges required.");
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.detail(), "Admin privileges required.");
    }
}
