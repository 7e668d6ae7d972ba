use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Coarse access-control category returned by the backend with the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    FieldOfficer,
    OfficeManager,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::FieldOfficer, Role::OfficeManager];

    /// Wire/storage spelling, e.g. `FIELD_OFFICER`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::FieldOfficer => "FIELD_OFFICER",
            Role::OfficeManager => "OFFICE_MANAGER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ModelError::UnknownRole(s.to_string()))
    }
}
