use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{AuditEvent, Role};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct AuditQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(q): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEvent>>, AppError> {
    if auth.role != Role::Admin {
        return Err(AppError::forbidden());
    }

    let per_page = q.per_page.unwrap_or(50).clamp(1, 200);
    let events = db::audit::list(&state.pool, per_page, page_offset(q.page, per_page)).await?;
    Ok(Json(events))
}

/// Row offset of a 1-based page; saturates instead of overflowing.
fn page_offset(page: Option<i64>, per_page: i64) -> i64 {
    page.unwrap_or(1)
        .max(1)
        .saturating_sub(1)
        .saturating_mul(per_page)
}

#[cfg(test)]
mod tests {
    use super::page_offset;

    #[test]
    fn offsets_start_at_the_first_page() {
        assert_eq!(page_offset(None, 50), 0);
        assert_eq!(page_offset(Some(0), 50), 0);
        assert_eq!(page_offset(Some(-3), 50), 0);
        assert_eq!(page_offset(Some(3), 50), 100);
    }

    #[test]
    fn huge_pages_saturate() {
        assert_eq!(page_offset(Some(i64::MAX), 200), i64::MAX);
    }
}
