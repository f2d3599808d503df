use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::ValidationError;
use thiserror::Error;
use uuid::Uuid;

use crate::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum GameServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("developer {0} does not exist")]
    Referential(Uuid),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("{0} overflowed while aggregating")]
    Overflow(&'static str),
}

impl From<JsonRejection> for GameServiceError {
    fn from(rejection: JsonRejection) -> Self {
        GameServiceError::Validation(ValidationError::single("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for GameServiceError {
    fn from(rejection: QueryRejection) -> Self {
        GameServiceError::Validation(ValidationError::single("query", rejection.body_text()))
    }
}

impl IntoResponse for GameServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            GameServiceError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "validation_error".to_string(),
                    message: errors.to_string(),
                    fields: errors.fields,
                },
            ),
            GameServiceError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("not_found", format!("{what} not found")),
            ),
            GameServiceError::Referential(developer_id) => {
                tracing::warn!(%developer_id, "game references a missing developer");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new("referential_error", "Referenced developer does not exist"),
                )
            }
            GameServiceError::Storage(e) => {
                tracing::error!(error = %e, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("storage_error", "Internal server error"),
                )
            }
            GameServiceError::Overflow(what) => {
                tracing::error!(what, "aggregate overflowed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("storage_error", "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
