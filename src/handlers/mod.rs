// handlers/mod.rs - Two-tier handler layout
//
// Public (no bearer token) → Protected (bearer token verified per request)
pub mod public;    // /, /health, /auth/login/google, /auth/callback, /auth/verify
pub mod protected; // /auth/complete-*, /auth/me
