use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;

/// Record an audit event. Called explicitly in handlers after mutations;
/// a failed write is logged and never fails the request.
pub async fn log_event(
    pool: &PgPool,
    actor: Option<&AuthUser>,
    action: &str,
    resource_type: &str,
    resource_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) {
    if let Err(e) = crate::db::audit::log_event(
        pool,
        actor.map(|a| a.user_id),
        action,
        resource_type,
        resource_id,
        details,
    )
    .await
    {
        tracing::error!("Failed to log audit event: {e}");
    }
}
