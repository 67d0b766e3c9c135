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
use crate::models::Company;
use crate::state::SharedState;
use crate::validation::company::{self, CompanyInput};

const UNIQUE: &[(&str, &str, &str)] = &[(
    "companies_company_name_key",
    "company_name",
    "Company already exists. Choose a unique name",
)];

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Company>>, AppError> {
    auth.require(Entity::Company, Action::View)?;
    let companies = db::companies::list(&state.pool).await?;
    Ok(Json(auth.scope(Entity::Company).filter(companies)))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CompanyInput>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    auth.require(Entity::Company, Action::Create)?;

    let valid = company::validate(req, None, &state.pool).await?;
    let company = db::companies::create(&state.pool, &valid)
        .await
        .map_err(|e| AppError::from_unique(e, UNIQUE))?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "company.created",
        "company",
        Some(company.id),
        Some(json!({ "company_name": company.company_name })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(company)))
}

async fn fetch(state: &SharedState, id: Uuid) -> Result<Company, AppError> {
    db::companies::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    auth.require(Entity::Company, Action::View)?;
    let company = fetch(&state, id).await?;
    auth.authorize(Entity::Company, Action::View, &company)?;
    Ok(Json(company))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompanyInput>,
) -> Result<Json<Company>, AppError> {
    auth.require(Entity::Company, Action::Update)?;
    let current = fetch(&state, id).await?;
    auth.authorize(Entity::Company, Action::Update, &current)?;

    let valid = company::validate(req.merged_over(&current), Some(id), &state.pool).await?;
    let company = db::companies::update(&state.pool, id, &valid)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Company not found".to_string()),
            _ => AppError::from_unique(e, UNIQUE),
        })?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "company.updated",
        "company",
        Some(company.id),
        None,
    )
    .await;

    Ok(Json(company))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require(Entity::Company, Action::Delete)?;
    let company = fetch(&state, id).await?;

    db::companies::delete(&state.pool, id)
        .await
        .map_err(|e| AppError::from_delete(e, "a company"))?;

    audit::log_event(
        &state.pool,
        Some(&auth),
        "company.deleted",
        "company",
        Some(id),
        Some(json!({ "company_name": company.company_name })),
    )
    .await;

    Ok(Json(json!({ "message": format!("Deleted company: {}", company.company_name) })))
}
