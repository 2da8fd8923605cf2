use serde::{Deserialize, Serialize};

use crate::supabase::Identity;

/// Body of `POST /auth/complete-profile`.
///
/// `role` stays a string so an unknown value is reported as a 400 with the
/// allowed set instead of a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteProfileRequest {
    pub full_name: String,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `POST /auth/complete-professional`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteProfessionalRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub professional_email: String,
    pub specialization: String,
    #[serde(default)]
    pub workplace: Option<String>,
}

/// Body of `POST /auth/complete-caregiver`.
///
/// The caller is the caregiver; `phone` doubles as the emergency contact.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteCaregiverRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub date_of_birth: String,
    pub gender: String,
    pub height_cm: i32,
    pub weight_kg: f64,
    pub home_address: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

/// Body of `POST /auth/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub access_token: String,
}

/// Provider-side view of the caller returned by `/auth/verify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<&Identity> for SessionUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email().map(str::to_string),
            full_name: identity.full_name().map(str::to_string),
            avatar_url: identity.avatar_url().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user: SessionUser,
    pub needs_onboarding: bool,
    pub profile: Option<serde_json::Value>,
}

/// Picks the display name for flows where the body may omit it, ending at the
/// identity's email.
pub(super) fn resolve_full_name(requested: Option<&str>, identity: &Identity, email: &str) -> String {
    requested
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or_else(|| identity.full_name())
        .unwrap_or(email)
        .to_string()
}
