// handlers/protected/auth/onboarding.rs - one-time profile completion
//
// All three routes answer with the created `users` row. A second call for the
// same identity is rejected with 400 "Profile already exists".

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::error::ApiError;
use crate::middleware::BearerToken;
use crate::models::UserProfile;
use crate::onboarding::{
    CompleteCaregiverRequest, CompleteProfessionalRequest, CompleteProfileRequest, Onboarding,
};
use crate::state::AppState;

/// POST /auth/complete-profile - generic onboarding with a caller-chosen role.
pub async fn complete_profile_post(
    State(state): State<AppState>,
    token: BearerToken,
    payload: Result<Json<CompleteProfileRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let supabase = state.supabase()?;
    let Json(request) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let profile = Onboarding::new(supabase)
        .complete_profile(token.as_str(), request)
        .await?;
    Ok(Json(profile))
}

/// POST /auth/complete-professional - professional account plus its
/// `professional_profiles` row.
pub async fn complete_professional_post(
    State(state): State<AppState>,
    token: BearerToken,
    payload: Result<Json<CompleteProfessionalRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let supabase = state.supabase()?;
    let Json(request) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let profile = Onboarding::new(supabase)
        .complete_professional(token.as_str(), request)
        .await?;
    Ok(Json(profile))
}

/// POST /auth/complete-caregiver - caregiver account, the elderly person's
/// profile, and their medical info.
pub async fn complete_caregiver_post(
    State(state): State<AppState>,
    token: BearerToken,
    payload: Result<Json<CompleteCaregiverRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let supabase = state.supabase()?;
    let Json(request) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let profile = Onboarding::new(supabase)
        .complete_caregiver(token.as_str(), request)
        .await?;
    Ok(Json(profile))
}
