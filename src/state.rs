use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;

/// Handle passed to every handler and extractor.
pub type SharedState = Arc<AppState>;

/// Everything a request needs: the connection pool for records and
/// identities, and the settings for token signing and lifetime. Nothing
/// mutable lives here; all state is in PostgreSQL.
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}
