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
use crate::models::Module;
use crate::state::SharedState;
use crate::validation::module::{self, ModuleInput};

const UNIQUE: &[(&str, &str, &str)] = &[
    (
        "modules_module_code_key",
        "module_code",
        "Module code is already in use",
    ),
    (
        "modules_employee_id_key",
        "employee_id",
        "This employee already owns a module",
    ),
];

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Module>>, AppError> {
    auth.require(Entity::Module, Action::View)?;
    let modules = db::modules::list(&state.pool).await?;
    Ok(Json(auth.scope(Entity::Module).filter(modules)))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<ModuleInput>,
) -> Result<(StatusCode, Json<Module>), AppError> {
    auth.require(Entity::Module, Action::Create)?;

    let valid = module::validate(req, None, &state.pool).await?;
    let module = db::modules::create(&state.pool, &valid)
        .await
        .map_err(|e| AppError::from_unique(e, UNIQUE))?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "module.created",
        "module",
        Some(module.id),
        Some(json!({ "module_name": module.module_name })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(module)))
}

async fn fetch(state: &SharedState, id: Uuid) -> Result<Module, AppError> {
    db::modules::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Module not found".to_string()))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Module>, AppError> {
    auth.require(Entity::Module, Action::View)?;
    let module = fetch(&state, id).await?;
    auth.authorize(Entity::Module, Action::View, &module)?;
    Ok(Json(module))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ModuleInput>,
) -> Result<Json<Module>, AppError> {
    auth.require(Entity::Module, Action::Update)?;
    let current = fetch(&state, id).await?;
    auth.authorize(Entity::Module, Action::Update, &current)?;

    let valid = module::validate(req.merged_over(&current), Some(id), &state.pool).await?;
    let module = db::modules::update(&state.pool, id, &valid)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Module not found".to_string()),
            _ => AppError::from_unique(e, UNIQUE),
        })?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "module.updated",
        "module",
        Some(module.id),
        None,
    )
    .await;

    Ok(Json(module))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require(Entity::Module, Action::Delete)?;
    let module = fetch(&state, id).await?;
    auth.authorize(Entity::Module, Action::Delete, &module)?;

    db::modules::delete(&state.pool, id)
        .await
        .map_err(|e| AppError::from_delete(e, "a module"))?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "module.deleted",
        "module",
        Some(id),
        Some(json!({ "module_name": module.module_name })),
    )
    .await;

    Ok(Json(json!({ "message": format!("{} deleted", module.module_name) })))
}
