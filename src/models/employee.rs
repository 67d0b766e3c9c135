use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum Gender {
    #[serde(rename = "M")]
    #[sqlx(rename = "M")]
    Male,
    #[serde(rename = "F")]
    #[sqlx(rename = "F")]
    Female,
}

impl Gender {
    pub fn from_code(code: &str) -> Option<Gender> {
        match code {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Unset until the profile is first filled in.
    pub age: Option<i32>,
    pub date_of_joining: NaiveDate,
    pub gender: Gender,
    pub salary: i32,
    pub updated_at: DateTime<Utc>,
}

/// Employee joined with the identity fields of its user.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct EmployeeProfile {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub employee: Employee,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}
