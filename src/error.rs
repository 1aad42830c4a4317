use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures raised by the data store accessor.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("no value supplied for placeholder :{0}")]
    UnboundParameter(String),

    #[error("parameter :{0} does not appear in the statement")]
    UnusedParameter(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures an HTTP handler can surface.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DataAccessError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        match self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "statement failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Database error",
                    }),
                )
                    .into_response()
            }
        }
    }
}
