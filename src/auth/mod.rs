//! Credential and session handling: password digests, bearer-token
//! issuance/verification and the middleware that guards every protected
//! route.

pub mod policy;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::AppError;
use crate::models::Role;
use crate::state::AppState;

/// Deterministic SHA-256 hex digest. Matching digests are the password
/// test; the transform is fast and unsalted.
pub fn hash_password(plain: &str) -> String {
    Sha256::digest(plain.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Claims carried by every bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub exp: i64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

/// Signing key and token lifetime, shared through [`AppState`].
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Signed HS256 token asserting `{sub, role}` until now + ttl.
    pub fn issue_token(&self, user_id: i64, role: Role) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            role,
            exp: (Utc::now() + self.token_ttl).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| AppError::InternalServerError)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
    }
}

/// The verified identity a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

/// Verifies the bearer credential and injects [`AuthUser`] as a request
/// extension for the handlers behind it.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing credentials".to_string()))?;

    let claims = state
        .auth
        .verify_token(token)
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_digest_is_deterministic() {
        assert_eq!(hash_password("hunter2"), hash_password("hunter2"));
        assert_ne!(hash_password("hunter2"), hash_password("hunter3"));
        // 32 bytes of hex
        assert_eq!(hash_password("x").len(), 64);
    }

    #[test]
    fn token_roundtrip_preserves_identity() {
        let auth = AuthConfig::new("test-secret", 2);
        let token = auth.issue_token(42, Role::Instructor).expect("issue");
        let claims = auth.verify_token(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Instructor);
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        // Negative ttl puts exp in the past, beyond jsonwebtoken's leeway.
        let auth = AuthConfig::new("test-secret", -1);
        let token = auth.issue_token(7, Role::Student).expect("issue");
        assert_eq!(auth.verify_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_and_wrong_key_tokens_are_invalid() {
        let auth = AuthConfig::new("test-secret", 2);
        assert_eq!(auth.verify_token("not-a-jwt"), Err(TokenError::Invalid));

        let other = AuthConfig::new("other-secret", 2);
        let token = other.issue_token(7, Role::Admin).expect("issue");
        assert_eq!(auth.verify_token(&token), Err(TokenError::Invalid));
    }
}
