//! Error types for the server

use crate::error::StuntingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Unprocessable input: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StuntingError> for ServerError {
    fn from(err: StuntingError) -> Self {
        match err {
            StuntingError::IncompleteInput { .. } => ServerError::Unprocessable(err.to_string()),
            StuntingError::FeatureNotFound(_)
            | StuntingError::InvalidInput(_)
            | StuntingError::UnknownCategory { .. } => ServerError::BadRequest(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::MethodNotAllowed(msg) => (StatusCode::METHOD_NOT_ALLOWED, msg.clone()),
            ServerError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let incomplete: ServerError = StuntingError::IncompleteInput {
            fields: vec!["Age".to_string()],
        }
        .into();
        assert_eq!(
            incomplete.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let unknown: ServerError = StuntingError::FeatureNotFound("Height".to_string()).into();
        assert_eq!(unknown.into_response().status(), StatusCode::BAD_REQUEST);

        assert_eq!(
            ServerError::NotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::MethodNotAllowed("x".to_string())
                .into_response()
                .status(),
            StatusCode::METHOD_NOT_ALLOWED
        );

        let internal: ServerError = StuntingError::ModelNotFitted.into();
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
