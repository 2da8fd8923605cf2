//! Onboarding workflow: verify the caller, make sure they have not onboarded
//! yet, then write the profile rows for the requested flow.
//!
//! Each request walks the same steps (token verified, existence checked,
//! inserting, inserted) with no state kept between requests. Multi-row flows
//! are not transactional: a failure part way through leaves the rows already
//! written in place.

pub mod requests;

pub use requests::{
    CompleteCaregiverRequest, CompleteProfessionalRequest, CompleteProfileRequest, SessionUser,
    VerifyRequest, VerifyResponse,
};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{
    tables, ElderlyProfile, InfoType, MedicalInfo, NewUserProfile, ProfessionalProfile, Role,
    UserProfile,
};
use crate::supabase::{Credential, Identity, SupabaseClient, SupabaseError};
use requests::resolve_full_name;

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Profile already exists")]
    AlreadyExists,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl From<SupabaseError> for OnboardingError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::InvalidToken(msg) => OnboardingError::Unauthorized(msg),
            SupabaseError::EmptyInsert(table) if table == tables::USERS => {
                OnboardingError::Internal("Failed to create profile".to_string())
            }
            other => OnboardingError::Internal(other.to_string()),
        }
    }
}

/// Failure of the `users` insert. The primary key on `users` is the real
/// uniqueness guard, so a unique violation there means the caller onboarded
/// concurrently. Dependent tables never map to `AlreadyExists`.
fn user_insert_error(err: SupabaseError) -> OnboardingError {
    match err {
        SupabaseError::UniqueViolation(_) => OnboardingError::AlreadyExists,
        other => other.into(),
    }
}

/// `id` of a returned row, whether the column is text or numeric.
fn row_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

pub struct Onboarding<'a> {
    supabase: &'a SupabaseClient,
}

impl<'a> Onboarding<'a> {
    pub fn new(supabase: &'a SupabaseClient) -> Self {
        Self { supabase }
    }

    pub async fn verify(&self, token: &str) -> Result<Identity, OnboardingError> {
        if token.trim().is_empty() {
            return Err(OnboardingError::Unauthorized("Missing access token".to_string()));
        }

        match self.supabase.auth().get_user(token).await {
            Ok(identity) => {
                debug!(user_id = %identity.id, "token verified");
                Ok(identity)
            }
            Err(SupabaseError::InvalidToken(msg)) => {
                warn!("Rejected access token: {}", msg);
                Err(OnboardingError::Unauthorized(msg))
            }
            Err(e) => {
                error!("Token verification failed: {}", e);
                Err(OnboardingError::Internal(e.to_string()))
            }
        }
    }

    async fn ensure_not_onboarded(&self, identity: &Identity) -> Result<(), OnboardingError> {
        let existing = self
            .supabase
            .store(Credential::ServiceRole)
            .find_user_row(&identity.id)
            .await?;

        if existing.is_some() {
            warn!(user_id = %identity.id, "onboarding rejected: profile already exists");
            return Err(OnboardingError::AlreadyExists);
        }
        debug!(user_id = %identity.id, "no existing profile");
        Ok(())
    }

    /// `users.email` is required; an identity without one cannot onboard.
    fn required_email(identity: &Identity) -> Result<&str, OnboardingError> {
        identity.email().ok_or_else(|| {
            warn!(user_id = %identity.id, "onboarding rejected: identity has no email");
            OnboardingError::InvalidArgument("Identity has no email address".to_string())
        })
    }

    fn new_user(
        identity: &Identity,
        email: &str,
        full_name: String,
        phone: Option<String>,
        role: Role,
    ) -> NewUserProfile {
        NewUserProfile {
            id: identity.id.clone(),
            email: email.to_string(),
            full_name,
            avatar_url: identity.avatar_url().map(str::to_string),
            phone,
            role,
            emergency_contact: None,
        }
    }

    /// Generic flow: a single `users` row with the requested role.
    pub async fn complete_profile(
        &self,
        token: &str,
        request: CompleteProfileRequest,
    ) -> Result<UserProfile, OnboardingError> {
        let role: Role = request
            .role
            .parse()
            .map_err(|e: crate::models::InvalidRole| OnboardingError::InvalidArgument(e.to_string()))?;

        let identity = self.verify(token).await?;
        let email = Self::required_email(&identity)?;
        self.ensure_not_onboarded(&identity).await?;

        let record = Self::new_user(&identity, email, request.full_name, request.phone, role);
        let created = self
            .supabase
            .store(Credential::ServiceRole)
            .insert_user(&record)
            .await
            .map_err(user_insert_error)?;

        info!(user_id = %created.id, role = %created.role, "profile completed");
        Ok(created)
    }

    /// Professional flow: `users` row then `professional_profiles` row.
    pub async fn complete_professional(
        &self,
        token: &str,
        request: CompleteProfessionalRequest,
    ) -> Result<UserProfile, OnboardingError> {
        let identity = self.verify(token).await?;
        let email = Self::required_email(&identity)?;
        self.ensure_not_onboarded(&identity).await?;

        let store = self.supabase.store(Credential::ServiceRole);
        let full_name = resolve_full_name(request.full_name.as_deref(), &identity, email);
        let record = Self::new_user(&identity, email, full_name, request.phone, Role::Professional);
        let created = store.insert_user(&record).await.map_err(user_insert_error)?;

        let professional = ProfessionalProfile {
            user_id: created.id.clone(),
            professional_email: request.professional_email,
            specialization: request.specialization,
            workplace: request.workplace,
        };
        if let Err(e) = store
            .insert_related(tables::PROFESSIONAL_PROFILES, &professional)
            .await
        {
            error!(
                user_id = %created.id,
                table = tables::PROFESSIONAL_PROFILES,
                "professional onboarding left a partial profile: {}", e
            );
            return Err(e.into());
        }

        info!(user_id = %created.id, "professional onboarding completed");
        Ok(created)
    }

    /// Caregiver flow: `users`, `elderly_profiles`, then one `medical_info`
    /// row per allergy, condition and medication.
    pub async fn complete_caregiver(
        &self,
        token: &str,
        request: CompleteCaregiverRequest,
    ) -> Result<UserProfile, OnboardingError> {
        let identity = self.verify(token).await?;
        let email = Self::required_email(&identity)?;
        self.ensure_not_onboarded(&identity).await?;

        let store = self.supabase.store(Credential::ServiceRole);
        let full_name = resolve_full_name(request.full_name.as_deref(), &identity, email);
        let mut record = Self::new_user(
            &identity,
            email,
            full_name,
            request.phone.clone(),
            Role::FamilySupervisor,
        );
        record.emergency_contact = request.phone.clone();
        let created = store.insert_user(&record).await.map_err(user_insert_error)?;

        let elderly = ElderlyProfile {
            user_id: created.id.clone(),
            date_of_birth: ElderlyProfile::normalize_date_of_birth(&request.date_of_birth),
            gender: request.gender.clone(),
            height_cm: request.height_cm,
            weight_kg: request.weight_kg,
            home_address: request.home_address.clone(),
        };
        let elderly_row = match store.insert_related(tables::ELDERLY_PROFILES, &elderly).await {
            Ok(row) => row,
            Err(e) => {
                error!(
                    user_id = %created.id,
                    table = tables::ELDERLY_PROFILES,
                    "caregiver onboarding left a partial profile: {}", e
                );
                return Err(e.into());
            }
        };

        // Schemas keyed on user_id return no separate id; fall back to the user
        let elderly_id = row_id(&elderly_row).unwrap_or_else(|| created.id.clone());
        let medical = medical_info_rows(&elderly_id, &identity.id, &request);
        if let Err(e) = store.insert_many(tables::MEDICAL_INFO, &medical).await {
            error!(
                user_id = %created.id,
                table = tables::MEDICAL_INFO,
                "caregiver onboarding left a partial profile: {}", e
            );
            return Err(e.into());
        }

        info!(
            user_id = %created.id,
            medical_rows = medical.len(),
            "caregiver onboarding completed"
        );
        Ok(created)
    }

    /// Profile for `/auth/me`.
    ///
    /// The existence check runs elevated so a missing profile reads as 403;
    /// the returned row is read with the caller's own token, so a row hidden
    /// by policy reads as 404.
    pub async fn current_profile(&self, token: &str) -> Result<UserProfile, OnboardingError> {
        let identity = self.verify(token).await?;

        let onboarded = self
            .supabase
            .store(Credential::ServiceRole)
            .find_user_row(&identity.id)
            .await?
            .is_some();
        if !onboarded {
            return Err(OnboardingError::Forbidden(
                "Profile not completed. Call /auth/complete-profile first.".to_string(),
            ));
        }

        self.supabase
            .store(Credential::User(token.to_string()))
            .find_user_by_id(&identity.id)
            .await?
            .ok_or_else(|| OnboardingError::NotFound("Profile not found".to_string()))
    }

    /// Provider identity plus the stored profile, if any, for `/auth/verify`.
    pub async fn verify_session(&self, access_token: &str) -> Result<VerifyResponse, OnboardingError> {
        let identity = self.verify(access_token).await?;
        let profile = self
            .supabase
            .store(Credential::ServiceRole)
            .find_user_row(&identity.id)
            .await?;

        Ok(VerifyResponse {
            user: SessionUser::from(&identity),
            needs_onboarding: profile.is_none(),
            profile,
        })
    }
}

/// One row per list entry: allergies, then conditions, then medications.
fn medical_info_rows(
    elderly_id: &str,
    added_by: &str,
    request: &CompleteCaregiverRequest,
) -> Vec<MedicalInfo> {
    let groups = [
        (InfoType::Allergy, &request.allergies),
        (InfoType::Condition, &request.conditions),
        (InfoType::Medication, &request.medications),
    ];

    groups
        .into_iter()
        .flat_map(|(info_type, names)| {
            names.iter().map(move |name| MedicalInfo {
                elderly_id: elderly_id.to_string(),
                info_type,
                name: name.clone(),
                added_by: added_by.to_string(),
            })
        })
        .collect()
}
