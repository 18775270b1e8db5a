//! Bearer-token guard for protected routes.
//!
//! Applied with `axum::middleware::from_fn_with_state` at route registration.
//! On success the resolved [`AuthorizationContext`] is placed in the request
//! extensions, where handlers pick it up with `Extension<AuthorizationContext>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejection;

use crate::web::api::AppState;
use crate::web::error::ApiError;

/// Identity resolved from a verified token. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    pub username: String,
}

pub async fn require_bearer(
    State(state): State<AppState>,
    auth: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(auth) = auth.map_err(|rejection| {
        tracing::debug!("authorization header rejected: {}", rejection);
        ApiError::Unauthorized("Missing or invalid authorization header".to_string())
    })?;

    let claims = state
        .tokens
        .verify(auth.token())
        .ok_or_else(|| ApiError::Unauthorized("Token expired or invalid".to_string()))?;

    req.extensions_mut().insert(AuthorizationContext {
        username: claims.username,
    });
    Ok(next.run(req).await)
}
