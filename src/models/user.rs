use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Elderly,
    FamilySupervisor,
    Professional,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Elderly, Role::FamilySupervisor, Role::Professional];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Elderly => "elderly",
            Role::FamilySupervisor => "family_supervisor",
            Role::Professional => "professional",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role '{0}'. Must be one of: elderly, family_supervisor, professional")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| InvalidRole(s.to_string()))
    }
}

/// Row of the `users` table as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Strict: a stored role outside [`Role::ALL`] fails to decode and the
    /// read surfaces as an internal error rather than an unknown role.
    pub role: Role,
    #[serde(default)]
    pub emergency_contact: Option<String>,
}

/// Insert payload for `users`.
///
/// `emergency_contact` is omitted from the JSON when unset so the generic
/// flow does not write the column at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}
