//! API error type and its JSON rendering.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::web::models::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed client input.
    #[error("{0}")]
    BadRequest(String),
    /// Bad credentials or a rejected bearer token.
    #[error("{0}")]
    Unauthorized(String),
    /// `/verify` was called without a token.
    #[error("Token is required")]
    TokenRequired,
    /// `/verify` was given a token that failed verification.
    #[error("Token is invalid or expired")]
    TokenRejected,
    /// Signing failed while issuing a login token.
    #[error("Failed to generate token")]
    TokenIssue,
    #[error("Endpoint not found")]
    NotFound,
    /// Never carries detail to the client.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::TokenRequired => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::TokenRejected => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::TokenIssue | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let valid = match self {
            ApiError::TokenRequired | ApiError::TokenRejected => Some(false),
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
            valid,
        };
        (self.status(), Json(body)).into_response()
    }
}
