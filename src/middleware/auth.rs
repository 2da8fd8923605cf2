use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::error::ApiError;

/// Raw access token from `Authorization: Bearer <token>`.
///
/// Extraction only checks the header shape; the token itself is verified by
/// the identity provider inside the handler. A missing or malformed header
/// is rejected with 401 before any outbound call.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_bearer_from_headers(&parts.headers)
            .map(BearerToken)
            .map_err(|msg| {
                tracing::warn!("Rejected request to {}: {}", parts.uri.path(), msg);
                ApiError::unauthorized(msg)
            })
    }
}

/// Extract bearer token from Authorization header
fn extract_bearer_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid authorization header".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Invalid authorization header".to_string())
    }
}
