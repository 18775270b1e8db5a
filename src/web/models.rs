//! Contains the data models for API requests and responses.

use std::collections::HashMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Represents a login request. Both fields are optional at the serde level so
/// that a missing field is a 400, not an extractor rejection.
#[derive(Deserialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Any other keys; only their presence matters.
    #[serde(flatten)]
    pub extra: HashMap<String, IgnoredAny>,
}

impl LoginRequest {
    /// True for `{}`, which the login handler treats like a missing body.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.extra.is_empty()
    }
}

/// Represents a login response with the signed token.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub username: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Represents a token verification request. `token` is `None` only when the
/// key is absent; `null` or a non-string value is kept as [`TokenField::Other`].
#[derive(Deserialize, Debug, Default)]
pub struct VerifyRequest {
    #[serde(default, deserialize_with = "present")]
    pub token: Option<TokenField>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum TokenField {
    Text(String),
    Other(IgnoredAny),
}

impl TokenField {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenField::Text(token) => Some(token),
            TokenField::Other(_) => None,
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<TokenField>, D::Error>
where
    D: Deserializer<'de>,
{
    TokenField::deserialize(deserializer).map(Some)
}

/// Represents a successful token verification.
#[derive(Serialize, Debug)]
pub struct VerifyResponse {
    pub success: bool,
    pub valid: bool,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Response for GET /health.
#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

/// Response for GET /protected.
#[derive(Serialize, Debug)]
pub struct ProtectedResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
    pub timestamp: String,
}

/// Body of every error response.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}
