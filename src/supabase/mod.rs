//! Client for the hosted Supabase project: GoTrue for token verification and
//! PostgREST for table reads and inserts.
//!
//! One [`SupabaseClient`] is built at startup and shared through the
//! application state. It hands out short-lived views bound to a credential:
//! [`SupabaseClient::auth`] for the identity endpoints and
//! [`SupabaseClient::store`] for table access.

pub mod auth;
pub mod rest;

pub use auth::{AuthClient, Identity};
pub use rest::ProfileStore;

use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::SupabaseConfig;

/// PostgreSQL `unique_violation`, passed through by PostgREST.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors from the Supabase client
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("Invalid Supabase URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Duplicate row: {0}")]
    UniqueViolation(String),

    #[error("Insert into {0} returned no rows")]
    EmptyInsert(String),

    #[error("Supabase responded {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Unexpected row shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Which key a request is signed with.
///
/// `Anon` and `User` are subject to row-level policy; `ServiceRole` bypasses it
/// when a distinct service-role key is configured.
#[derive(Clone)]
pub enum Credential {
    Anon,
    ServiceRole,
    User(String),
}

impl Credential {
    fn label(&self) -> &'static str {
        match self {
            Credential::Anon => "anon",
            Credential::ServiceRole => "service_role",
            Credential::User(_) => "user",
        }
    }
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
    service_role_key: Option<String>,
}

impl SupabaseClient {
    pub fn new(
        url: &str,
        anon_key: impl Into<String>,
        service_role_key: Option<String>,
    ) -> Result<Self, SupabaseError> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| SupabaseError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            anon_key: anon_key.into(),
            service_role_key,
        })
    }

    /// Builds the client from configuration.
    ///
    /// Returns `Ok(None)` when the URL or anon key is absent; callers treat that
    /// as a disabled backend and fail every operation with "not configured".
    pub fn from_config(config: &SupabaseConfig) -> Result<Option<Self>, SupabaseError> {
        let (Some(url), Some(anon_key)) = (config.url.as_deref(), config.anon_key.as_deref()) else {
            return Ok(None);
        };
        Self::new(url, anon_key, config.service_role_key.clone()).map(Some)
    }

    /// True only when a service-role key distinct from the anon key is set.
    pub fn service_role_enabled(&self) -> bool {
        self.service_role_key
            .as_deref()
            .is_some_and(|key| key != self.anon_key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(self)
    }

    pub fn store(&self, credential: Credential) -> ProfileStore<'_> {
        ProfileStore::new(self, credential)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SupabaseError> {
        self.base_url
            .join(path)
            .map_err(|e| SupabaseError::InvalidUrl(e.to_string()))
    }

    /// `apikey` header value and bearer token for a credential.
    fn keys_for<'a>(&'a self, credential: &'a Credential) -> (&'a str, &'a str) {
        match credential {
            Credential::Anon => (self.anon_key.as_str(), self.anon_key.as_str()),
            Credential::ServiceRole => {
                let key = self.service_role_key.as_deref().unwrap_or(self.anon_key.as_str());
                (key, key)
            }
            Credential::User(token) => (self.anon_key.as_str(), token.as_str()),
        }
    }
}

/// Turns a non-success response into a [`SupabaseError`].
///
/// GoTrue reports `msg`/`error_description`, PostgREST reports `message` and a
/// SQLSTATE `code`. Only SQLSTATE `23505` counts as a unique violation;
/// PostgREST answers 409 for foreign-key failures too.
async fn error_from_response(response: reqwest::Response) -> SupabaseError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: Option<Value> = serde_json::from_str(&body).ok();

    let field = |key: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let message = field("message")
        .or_else(|| field("msg"))
        .or_else(|| field("error_description"))
        .or_else(|| field("error"))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.clone()
            }
        });
    let code = field("code").or_else(|| field("error_code"));

    if code.as_deref() == Some(UNIQUE_VIOLATION) {
        return SupabaseError::UniqueViolation(message);
    }

    SupabaseError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_role_requires_distinct_key() {
        let anon_only = SupabaseClient::new("https://demo.supabase.co", "anon", None).unwrap();
        assert!(!anon_only.service_role_enabled());

        let same_key =
            SupabaseClient::new("https://demo.supabase.co", "anon", Some("anon".to_string())).unwrap();
        assert!(!same_key.service_role_enabled());

        let elevated =
            SupabaseClient::new("https://demo.supabase.co", "anon", Some("service".to_string())).unwrap();
        assert!(elevated.service_role_enabled());
    }

    #[test]
    fn test_service_role_falls_back_to_anon_key() {
        let client = SupabaseClient::new("https://demo.supabase.co", "anon", None).unwrap();
        assert_eq!(client.keys_for(&Credential::ServiceRole), ("anon", "anon"));

        let user = Credential::User("caller-jwt".to_string());
        assert_eq!(client.keys_for(&user), ("anon", "caller-jwt"));
    }

    #[test]
    fn test_from_config_disabled_without_url_or_key() {
        let missing_key = SupabaseConfig {
            url: Some("https://demo.supabase.co".to_string()),
            ..Default::default()
        };
        assert!(SupabaseClient::from_config(&missing_key).unwrap().is_none());

        let complete = SupabaseConfig {
            url: Some("https://demo.supabase.co".to_string()),
            anon_key: Some("anon".to_string()),
            service_role_key: None,
        };
        assert!(SupabaseClient::from_config(&complete).unwrap().is_some());
    }

    #[test]
    fn test_endpoint_keeps_project_path() {
        let client = SupabaseClient::new("http://localhost:54321/project", "anon", None).unwrap();
        let url = client.endpoint("rest/v1/users").unwrap();
        assert_eq!(url.as_str(), "http://localhost:54321/project/rest/v1/users");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(matches!(
            SupabaseClient::new("not a url", "anon", None),
            Err(SupabaseError::InvalidUrl(_))
        ));
    }
}
