// handlers/public/auth/oauth.rs - Google sign-in through Supabase

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/login/google - URL the client should redirect the user to.
///
/// `redirect_to` overrides the configured callback.
pub async fn login_google_get(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<Value>, ApiError> {
    let supabase = state.supabase()?;
    let redirect_to = query
        .redirect_to
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| state.config.oauth.default_redirect.clone());

    let url = supabase
        .auth()
        .authorize_url(&state.config.oauth.provider, &redirect_to)?;

    Ok(Json(json!({ "url": url.as_str() })))
}

/// GET /auth/callback - landing page after the provider redirect.
///
/// The code is handed back for the client to exchange with Supabase; it is
/// not exchanged here.
pub async fn callback_get(Query(query): Query<CallbackQuery>) -> Result<Json<Value>, ApiError> {
    if let Some(error) = query.error.filter(|e| !e.is_empty()) {
        tracing::warn!("OAuth callback returned error: {}", error);
        return Err(ApiError::bad_request(error));
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("No authorization code provided"))?;

    Ok(Json(json!({
        "message": "Authentication successful",
        "code": code,
        "note": "Exchange this code on the frontend using supabase.auth.exchangeCodeForSession()"
    })))
}
