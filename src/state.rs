use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::supabase::{SupabaseClient, SupabaseError};

/// Shared, read-only application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when Supabase is not configured
    pub supabase: Option<SupabaseClient>,
}

impl AppState {
    pub fn new(config: AppConfig, supabase: Option<SupabaseClient>) -> Self {
        Self {
            config: Arc::new(config),
            supabase,
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self, SupabaseError> {
        let supabase = SupabaseClient::from_config(&config.supabase)?;
        Ok(Self::new(config, supabase))
    }

    /// The configured client, or a 500 when the backend is disabled.
    pub fn supabase(&self) -> Result<&SupabaseClient, ApiError> {
        self.supabase
            .as_ref()
            .ok_or_else(|| ApiError::internal_server_error("Supabase not configured"))
    }

    pub fn service_role_enabled(&self) -> bool {
        self.supabase
            .as_ref()
            .is_some_and(SupabaseClient::service_role_enabled)
    }
}
