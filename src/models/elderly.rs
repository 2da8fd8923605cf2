use serde::{Deserialize, Serialize};

/// Row of `elderly_profiles`, created by the caregiver flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElderlyProfile {
    pub user_id: String,
    /// ISO `YYYY-MM-DD` when the input was `DD/MM/YYYY`, otherwise as supplied
    pub date_of_birth: String,
    pub gender: String,
    pub height_cm: i32,
    pub weight_kg: f64,
    pub home_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoType {
    Allergy,
    Condition,
    Medication,
}

/// Append-only row of `medical_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalInfo {
    pub elderly_id: String,
    pub info_type: InfoType,
    pub name: String,
    pub added_by: String,
}

impl ElderlyProfile {
    /// Rewrites `DD/MM/YYYY` as `YYYY-MM-DD`.
    ///
    /// Anything that does not split into exactly three `/` parts is returned
    /// unchanged; the store decides whether it is a valid date.
    pub fn normalize_date_of_birth(input: &str) -> String {
        let parts: Vec<&str> = input.split('/').collect();
        match parts.as_slice() {
            [day, month, year] => format!("{}-{:0>2}-{:0>2}", year, month, day),
            _ => input.to_string(),
        }
    }
}
