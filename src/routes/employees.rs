use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::access::{Action, Entity};
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::EmployeeProfile;
use crate::state::SharedState;
use crate::validation::employee::{self, EmployeeInput};

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<EmployeeProfile>>, AppError> {
    auth.require(Entity::Employee, Action::View)?;
    let employees = db::employees::list_profiles(&state.pool).await?;
    Ok(Json(auth.scope(Entity::Employee).filter(employees)))
}

async fn fetch(state: &SharedState, id: Uuid) -> Result<EmployeeProfile, AppError> {
    db::employees::find_profile(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeProfile>, AppError> {
    auth.require(Entity::Employee, Action::View)?;
    let profile = fetch(&state, id).await?;
    auth.authorize(Entity::Employee, Action::View, &profile)?;
    Ok(Json(profile))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EmployeeInput>,
) -> Result<Json<EmployeeProfile>, AppError> {
    auth.require(Entity::Employee, Action::Update)?;
    let current = fetch(&state, id).await?;
    auth.authorize(Entity::Employee, Action::Update, &current)?;

    let valid = employee::validate(req.merged_over(&current.employee), Utc::now().date_naive())?;
    db::employees::update(&state.pool, id, &valid)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Employee not found".to_string()),
            _ => AppError::Database(e),
        })?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "employee.updated",
        "employee",
        Some(id),
        None,
    )
    .await;

    Ok(Json(fetch(&state, id).await?))
}

/// Removes the user together with its employee record; projects it leads
/// and modules it owns or is assigned go with it.
pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require(Entity::Employee, Action::Delete)?;
    let profile = fetch(&state, id).await?;

    if profile.employee.id == auth.employee_id {
        return Err(AppError::Conflict(
            "You cannot delete your own account".to_string(),
        ));
    }

    db::users::delete(&state.pool, profile.employee.user_id)
        .await
        .map_err(|e| AppError::from_delete(e, "an employee"))?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "employee.deleted",
        "employee",
        Some(id),
        Some(json!({ "email": profile.email })),
    )
    .await;

    Ok(Json(json!({ "message": format!("{} deleted", profile.full_name) })))
}
