use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Module {
    pub id: Uuid,
    pub module_name: String,
    pub module_code: String,
    pub project_id: Uuid,
    /// Sole owner; an employee owns at most one module.
    pub employee_id: Uuid,
    pub assignee_id: Uuid,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
