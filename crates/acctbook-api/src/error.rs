//! Error types for acctbook-api

use acctbook_core::{CoreError, ErrorCode};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e.code() {
                ErrorCode::ItemNotFound => StatusCode::NOT_FOUND,
                ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::NotLoaded => StatusCode::CONFLICT,
                ErrorCode::FetchFailed | ErrorCode::DeleteFailed | ErrorCode::SaveFailed => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Core(e) => serde_json::to_value(e.to_details()).unwrap_or_default(),
            other => serde_json::json!({ "message": other.to_string() }),
        };
        (self.status(), axum::Json(serde_json::json!({ "error": body }))).into_response()
    }
}
