use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Lifecycle of the most recent login attempt; says nothing about whether
/// the current session is still valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// The authenticated user's credential and profile bundle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub employee_id: Option<i64>,
    pub team_id: Option<i64>,
    pub status: LoginStatus,
    pub error: Option<String>,
}

impl Session {
    /// Presence check only; no validity or expiry is implied.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_manager(&self) -> bool {
        self.role == Some(Role::Manager)
    }

    /// A manager whose employee id is known but whose team has not been resolved.
    pub fn needs_team(&self) -> bool {
        self.is_manager() && self.employee_id.is_some() && self.team_id.is_none()
    }

    /// "First Last", falling back to the username.
    pub fn display_name(&self) -> Option<String> {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.username.clone()
        } else {
            Some(full)
        }
    }
}
