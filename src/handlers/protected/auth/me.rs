// handlers/protected/auth/me.rs - GET /auth/me handler

use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::middleware::BearerToken;
use crate::models::UserProfile;
use crate::onboarding::Onboarding;
use crate::state::AppState;

/// GET /auth/me - the caller's completed profile.
///
/// 403 until onboarding is done; 404 if the row exists but the caller's own
/// credential cannot read it.
pub async fn me_get(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<UserProfile>, ApiError> {
    let supabase = state.supabase()?;
    let profile = Onboarding::new(supabase)
        .current_profile(token.as_str())
        .await?;
    Ok(Json(profile))
}
