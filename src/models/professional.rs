use serde::{Deserialize, Serialize};

/// Row of `professional_profiles`, one per professional user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    pub user_id: String,
    pub professional_email: String,
    pub specialization: String,
    #[serde(default)]
    pub workplace: Option<String>,
}
