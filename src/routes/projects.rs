use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::access::{Action, Entity};
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::Project;
use crate::state::SharedState;
use crate::validation::project::{self, ProjectInput};

const UNIQUE: &[(&str, &str, &str)] = &[
    (
        "projects_project_code_key",
        "project_code",
        "Project code is already in use",
    ),
    (
        "projects_company_name_key",
        "project_name",
        "There is already a project with this name",
    ),
];

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Project>>, AppError> {
    auth.require(Entity::Project, Action::View)?;
    let projects = db::projects::list(&state.pool).await?;
    Ok(Json(auth.scope(Entity::Project).filter(projects)))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    auth.require(Entity::Project, Action::Create)?;

    let valid = project::validate(req, None, &state.pool).await?;

    let mut tx = state.pool.begin().await?;
    let project = db::projects::create(&mut tx, &valid)
        .await
        .map_err(|e| AppError::from_unique(e, UNIQUE))?;
    tx.commit().await?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "project.created",
        "project",
        Some(project.id),
        Some(json!({ "project_name": project.project_name })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(project)))
}

async fn fetch(state: &SharedState, id: Uuid) -> Result<Project, AppError> {
    db::projects::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    auth.require(Entity::Project, Action::View)?;
    let project = fetch(&state, id).await?;
    auth.authorize(Entity::Project, Action::View, &project)?;
    Ok(Json(project))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProjectInput>,
) -> Result<Json<Project>, AppError> {
    auth.require(Entity::Project, Action::Update)?;
    let current = fetch(&state, id).await?;
    auth.authorize(Entity::Project, Action::Update, &current)?;

    let valid = project::validate(req.merged_over(&current), Some(id), &state.pool).await?;

    let mut tx = state.pool.begin().await?;
    let project = db::projects::update(&mut tx, id, &valid)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Project not found".to_string()),
            _ => AppError::from_unique(e, UNIQUE),
        })?;
    tx.commit().await?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "project.updated",
        "project",
        Some(project.id),
        None,
    )
    .await;

    Ok(Json(project))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require(Entity::Project, Action::Delete)?;
    let project = fetch(&state, id).await?;
    auth.authorize(Entity::Project, Action::Delete, &project)?;

    db::projects::delete(&state.pool, id)
        .await
        .map_err(|e| AppError::from_delete(e, "a project"))?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "project.deleted",
        "project",
        Some(id),
        Some(json!({ "project_name": project.project_name })),
    )
    .await;

    Ok(Json(json!({ "message": format!("{} deleted", project.project_name) })))
}
