use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

pub mod application;
pub mod invitation;
pub mod twitter;
pub mod user;
pub mod wallet;

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    data: T,
}
impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

/// Error envelope: a human message plus the stable per-route numeric code
/// clients dispatch on.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u32,
}

/// A handler failure already tagged with its route's error code.
#[derive(Debug)]
pub struct ApiError {
    pub code: u32,
    pub message: String,
}

impl ApiError {
    pub fn new(code: u32, error: impl std::fmt::Display) -> Self {
        Self {
            code,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(code = self.code, message = %self.message, "request failed");

        let body = Json(ErrorResponse {
            message: self.message,
            code: self.code,
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
