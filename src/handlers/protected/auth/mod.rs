// handlers/protected/auth/mod.rs - Profile onboarding and lookup

pub mod me;         // GET /auth/me
pub mod onboarding; // POST /auth/complete-profile, -professional, -caregiver

pub use me::me_get;
pub use onboarding::{complete_caregiver_post, complete_professional_post, complete_profile_post};
