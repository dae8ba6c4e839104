use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] core_types::CoreError),
    #[error("Invalid query string: {0}")]
    QueryRejected(#[from] QueryRejection),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dataset(dataset_err) => {
                tracing::error!(error = %dataset_err, "Dataset error.");
                (StatusCode::INTERNAL_SERVER_ERROR, dataset_err.to_string())
            }
            AppError::InvalidQuery(core_err) => (StatusCode::BAD_REQUEST, core_err.to_string()),
            AppError::QueryRejected(rejection) => (rejection.status(), rejection.body_text()),
            AppError::Internal(message) => {
                tracing::error!(error = %message, "Internal error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
