use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three fixed designations. Stored as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum Role {
    Admin,
    TeamLeader,
    Employee,
}

impl Role {
    pub const DESIGNATIONS: [&'static str; 3] = ["Admin", "Team Leader", "Employee"];

    /// Parse the human-facing designation used on the registration form.
    pub fn from_designation(designation: &str) -> Option<Role> {
        match designation {
            "Admin" => Some(Role::Admin),
            "Team Leader" => Some(Role::TeamLeader),
            "Employee" => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn designation(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::TeamLeader => "Team Leader",
            Role::Employee => "Employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.designation())
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub can_register: bool,
    pub created_at: DateTime<Utc>,
}
