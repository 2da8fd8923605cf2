// handlers/public/auth/verify.rs - POST /auth/verify handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::error::ApiError;
use crate::onboarding::{Onboarding, VerifyRequest, VerifyResponse};
use crate::state::AppState;

/// POST /auth/verify - resolve an access token sent in the body.
///
/// Returns the provider identity, whether onboarding is still needed, and the
/// stored `users` row when there is one.
pub async fn verify_post(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let supabase = state.supabase()?;
    let Json(request) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let response = Onboarding::new(supabase)
        .verify_session(&request.access_token)
        .await?;
    Ok(Json(response))
}
