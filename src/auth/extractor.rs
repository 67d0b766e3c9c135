use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::access::{self, Action, Entity, Scope, Scoped};
use crate::auth::jwt;
use crate::db;
use crate::error::AppError;
use crate::models::Role;
use crate::state::SharedState;

pub const ACCESS_COOKIE: &str = "access_token";

/// The acting identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub employee_id: Uuid,
    pub role: Role,
    pub can_register: bool,
}

impl AuthUser {
    /// Deny unless the role's capability table allows `action` on `entity`.
    pub fn require(&self, entity: Entity, action: Action) -> Result<(), AppError> {
        if access::permits(self.role, entity, action) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                role = %self.role,
                "denied {action:?} on {}",
                entity.as_str()
            );
            Err(AppError::forbidden())
        }
    }

    pub fn scope(&self, entity: Entity) -> Scope {
        access::scope(self.role, entity, self.employee_id)
    }

    /// Capability check plus membership of `record` in this identity's scope.
    pub fn authorize<T: Scoped>(
        &self,
        entity: Entity,
        action: Action,
        record: &T,
    ) -> Result<(), AppError> {
        self.require(entity, action)?;
        if record.within(&self.scope(entity)) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                role = %self.role,
                "{} outside scope for {action:?}",
                entity.as_str()
            );
            Err(AppError::forbidden())
        }
    }

    pub fn require_register(&self) -> Result<(), AppError> {
        if self.can_register {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, "registration without capability");
            Err(AppError::forbidden())
        }
    }
}

/// Bearer token from the Authorization header, falling back to the cookie.
fn token_from(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(auth_header) = parts.headers.get("authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(Some(token.to_string()));
        }
    }

    let jar = CookieJar::from_headers(&parts.headers);
    Ok(jar.get(ACCESS_COOKIE).map(|c| c.value().to_string()))
}

/// Resolve a token to the identity as it currently stands in the store.
/// Role and registration capability come from the user row, so a deleted
/// or demoted account loses its rights before the token expires.
pub(crate) async fn identify(token: &str, state: &SharedState) -> Result<AuthUser, AppError> {
    let claims = jwt::decode_token(token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    let user = db::users::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    let employee = db::employees::find_by_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    Ok(AuthUser {
        user_id: user.id,
        employee_id: employee.id,
        role: user.role,
        can_register: user.can_register,
    })
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from(parts)?
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;
        identify(&token, state).await
    }
}

/// Absent credentials yield `None`; present but invalid ones are still rejected.
impl OptionalFromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match token_from(parts)? {
            Some(token) => identify(&token, state).await.map(Some),
            None => Ok(None),
        }
    }
}
