//! Defines the Axum API routes and handlers.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{SecondsFormat, Utc};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::web::auth::{CredentialStore, InMemoryCredentialStore};
use crate::web::error::ApiError;
use crate::web::guard::{AuthorizationContext, require_bearer};
use crate::web::models::{
    HealthResponse, LoginRequest, LoginResponse, ProtectedResponse, VerifyRequest, VerifyResponse,
};
use crate::web::token::TokenService;

pub struct AppStateInner {
    pub credentials: Box<dyn CredentialStore>,
    pub tokens: TokenService,
}
pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    /// Lab user table plus a token service built from `config`.
    pub fn from_config(config: &Config) -> AppState {
        Arc::new(Self {
            credentials: Box::new(InMemoryCredentialStore::with_lab_users()),
            tokens: TokenService::from_config(config),
        })
    }
}

/// Creates the Axum router with all the API endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/verify", post(verify))
        .route(
            "/protected",
            get(protected)
                .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer)),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Router over the default configuration, for tests and quick demos.
pub fn app() -> Router {
    create_router(AppStateInner::from_config(&Config::default()))
}

/// Wide-open CORS so the lab's static frontend can call from any origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("handler panicked: {}", detail);
    ApiError::Internal.into_response()
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn log_request(endpoint: &str, method: &str, username: Option<&str>, status: StatusCode) {
    match username {
        Some(username) => {
            tracing::info!(endpoint, method, username, status = status.as_u16(), "request")
        }
        None => tracing::info!(endpoint, method, status = status.as_u16(), "request"),
    }
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Authentication Lab Backend is running".to_string(),
        timestamp: now_iso(),
    })
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let payload = match payload {
        Ok(Json(payload)) if !payload.is_empty() => payload,
        Ok(_) => {
            log_request("/login", "POST", None, StatusCode::BAD_REQUEST);
            return Err(ApiError::BadRequest("Request body must be JSON".to_string()));
        }
        Err(rejection) => {
            tracing::debug!("login body rejected: {}", rejection);
            log_request("/login", "POST", None, StatusCode::BAD_REQUEST);
            return Err(ApiError::BadRequest("Request body must be JSON".to_string()));
        }
    };

    let username = payload.username.as_deref().unwrap_or_default().trim().to_string();
    let password = payload.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        log_request("/login", "POST", Some(&username), StatusCode::BAD_REQUEST);
        return Err(ApiError::BadRequest("Username and password are required".to_string()));
    }

    if state.credentials.authenticate(&username, &password).await.is_none() {
        log_request("/login", "POST", Some(&username), StatusCode::UNAUTHORIZED);
        return Err(ApiError::Unauthorized("Invalid username or password".to_string()));
    }

    let token = match state.tokens.issue(&username) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Token generation error: {}", e);
            log_request("/login", "POST", Some(&username), StatusCode::INTERNAL_SERVER_ERROR);
            return Err(ApiError::TokenIssue);
        }
    };

    log_request("/login", "POST", Some(&username), StatusCode::OK);
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        username,
        expires_in: state.tokens.expires_in(),
    }))
}

/// GET /protected -- requires a valid bearer token
async fn protected(Extension(ctx): Extension<AuthorizationContext>) -> Json<ProtectedResponse> {
    log_request("/protected", "GET", Some(&ctx.username), StatusCode::OK);
    Json(ProtectedResponse {
        success: true,
        message: "Access granted to protected endpoint".to_string(),
        username: ctx.username,
        timestamp: now_iso(),
    })
}

/// POST /verify
async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let token = payload
        .ok()
        .and_then(|Json(body)| body.token)
        .ok_or(ApiError::TokenRequired)?;

    // A null or non-string token fails like any other bad token.
    match token.as_str().and_then(|token| state.tokens.verify(token)) {
        Some(claims) => {
            log_request("/verify", "POST", Some(&claims.username), StatusCode::OK);
            Ok(Json(VerifyResponse {
                success: true,
                valid: true,
                username: claims.username,
                iat: claims.iat,
                exp: claims.exp,
            }))
        }
        None => {
            log_request("/verify", "POST", None, StatusCode::UNAUTHORIZED);
            Err(ApiError::TokenRejected)
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
