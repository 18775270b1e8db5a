//! HS256 token issuance and verification.
//!
//! A token is valid iff its signature matches the shared secret and the current
//! time is before `exp`. There is no revocation list and no leeway.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], lifetime_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime_secs,
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.auth.secret_key.as_bytes(), config.token_lifetime_secs())
    }

    /// Seconds between issuance and expiry.
    pub fn expires_in(&self) -> i64 {
        self.lifetime_secs
    }

    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_at(username, Utc::now().timestamp())
    }

    /// Issue a token as if the clock read `issued_at` (epoch seconds).
    pub fn issue_at(&self, username: &str, issued_at: i64) -> Result<String, TokenError> {
        let claims = TokenClaims {
            username: username.to_string(),
            iat: issued_at,
            exp: issued_at + self.lifetime_secs,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Decode and check signature and expiry. Malformed, forged and expired
    /// tokens all come back as `None`.
    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            // jsonwebtoken only rejects `exp < now`; a token is dead from `exp` on.
            Ok(data) if data.claims.exp <= Utc::now().timestamp() => {
                tracing::debug!("token rejected: expired at {}", data.claims.exp);
                None
            }
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("token rejected: {}", e);
                None
            }
        }
    }
}
