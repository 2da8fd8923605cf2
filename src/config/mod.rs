use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub supabase: SupabaseConfig,
    pub api: ApiConfig,
    pub oauth: OAuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Connection settings for the hosted auth + PostgREST backend.
///
/// `url` and `anon_key` are both required for the client to be enabled.
/// `service_role_key` is optional; without it elevated writes fall back to
/// the anon key and remain subject to row-level policy.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub service_role_key: Option<String>,
}

// Keys stay out of logs.
impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "<redacted>"))
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_bytes: usize,
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub provider: String,
    pub default_redirect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
}

impl SecurityConfig {
    /// Any-origin CORS when no origins are listed or the list contains `*`.
    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Supabase
        self.supabase.url = non_empty_var("SUPABASE_URL");
        self.supabase.anon_key = non_empty_var("SUPABASE_KEY");
        self.supabase.service_role_key = non_empty_var("SUPABASE_SERVICE_ROLE_KEY");

        // API overrides
        if let Ok(v) = env::var("API_HOST") {
            self.api.host = v;
        }
        if let Some(port) = env::var("CARENET_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("RUST_LOG") {
            self.api.log_filter = v;
        }

        // OAuth overrides
        if let Ok(v) = env::var("OAUTH_DEFAULT_REDIRECT") {
            self.oauth.default_redirect = v;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            supabase: SupabaseConfig::default(),
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
                log_filter: "carenet_api=debug,tower_http=info".to_string(),
            },
            oauth: OAuthConfig {
                provider: "google".to_string(),
                default_redirect: "http://localhost:8000/auth/callback".to_string(),
            },
            security: SecurityConfig {
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                log_filter: "carenet_api=debug,tower_http=info".to_string(),
                max_request_size_bytes: 1024 * 1024, // 1MB
                ..Self::development().api
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.carenet.app".to_string()],
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                log_filter: "info".to_string(),
                max_request_size_bytes: 256 * 1024,
                ..Self::development().api
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.carenet.app".to_string()],
            },
            ..Self::development()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
