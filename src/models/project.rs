use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_code: String,
    pub project_name: String,
    pub team_leader_id: Uuid,
    /// Employee ids, aggregated from `project_members`.
    pub team_members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
