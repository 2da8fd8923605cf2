pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod onboarding;
pub mod state;
pub mod supabase;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);
    let body_limit = state.config.api.max_request_size_bytes;

    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // Public auth routes
        .merge(auth_public_routes())
        // Bearer-protected auth routes
        .merge(auth_routes())
        .with_state(state)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/login/google", get(auth::login_google_get))
        .route("/auth/callback", get(auth::callback_get))
        .route("/auth/verify", post(auth::verify_post))
}

fn auth_routes() -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/auth/complete-profile", post(auth::complete_profile_post))
        .route("/auth/complete-professional", post(auth::complete_professional_post))
        .route("/auth/complete-caregiver", post(auth::complete_caregiver_post))
        .route("/auth/me", get(auth::me_get))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
