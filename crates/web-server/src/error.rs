use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing JSON body or required fields 'query_type'/'value'")]
    InvalidRequest,
    #[error("query_type '{0}' is not supported")]
    UnsupportedQueryType(String),
    #[error(transparent)]
    Database(#[from] database::DbError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest | AppError::UnsupportedQueryType(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Backend failures keep their message so the caller sees what went wrong.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
            }
            rejected => {
                tracing::warn!(error = %rejected, "Rejected query request.");
            }
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
