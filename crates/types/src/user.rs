//! User accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Student,
    Admin,
    SuperAdmin,
}

impl UserRole {
    /// Whether this role may use the admin triage surface.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    /// Invited but not yet signed in.
    Pending,
    #[serde(other)]
    Other,
}

/// A user account as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, alias = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(default, alias = "invitedAt")]
    pub invited_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "lastLoginAt")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Display name preference: full name, else username, else email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.full_name.as_deref() {
            let name = name.trim();
            if !name.is_empty() {
                return name;
            }
        }
        if !self.username.trim().is_empty() {
            return self.username.trim();
        }
        self.email.trim()
    }
}
