// handlers/public/auth/mod.rs - Public authentication handlers

pub mod oauth;  // GET /auth/login/google, GET /auth/callback
pub mod verify; // POST /auth/verify

pub use oauth::{callback_get, login_google_get};
pub use verify::verify_post;
