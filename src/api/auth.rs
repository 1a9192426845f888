// ==========================================
// Order Batch Ingestion Service - Bearer auth middleware
// ==========================================
// Verifies `Authorization: Bearer <jwt>` (HS256) against the configured
// key. Token issuance lives elsewhere; this service only verifies.
// ==========================================

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Verified token claims, inserted into request extensions for handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Operator identity
    pub sub: String,
    /// Expiry (unix seconds)
    pub exp: usize,
    /// Issued at (unix seconds)
    pub iat: usize,
}

/// Middleware requiring a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let path = req.uri().path().to_string();

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            ApiError::Unauthorized("missing Authorization header".to_string())
                .into_response_for(&path)
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized("expected a bearer token".to_string()).into_response_for(&path)
    })?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| {
        ApiError::Unauthorized("invalid or expired token".to_string()).into_response_for(&path)
    })?
    .claims;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Issue a short-lived HS256 token for the given subject.
///
/// Used by operator tooling and the test suite; the service itself only
/// verifies tokens.
pub fn issue_token(secret: &str, sub: &str, ttl_secs: i64) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        exp: (now + chrono::Duration::seconds(ttl_secs)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
