pub mod elderly;
pub mod professional;
pub mod user;

pub use elderly::{ElderlyProfile, InfoType, MedicalInfo};
pub use professional::ProfessionalProfile;
pub use user::{InvalidRole, NewUserProfile, Role, UserProfile};

/// PostgREST table names
pub mod tables {
    pub const USERS: &str = "users";
    pub const PROFESSIONAL_PROFILES: &str = "professional_profiles";
    pub const ELDERLY_PROFILES: &str = "elderly_profiles";
    pub const MEDICAL_INFO: &str = "medical_info";
}
