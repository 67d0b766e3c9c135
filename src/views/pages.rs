use std::collections::HashMap;

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use uuid::Uuid;

use crate::access::{Action, Entity};
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::Role;
use crate::state::SharedState;
use crate::validation::TIMESTAMP_OUT;

#[derive(Template)]
#[template(path = "companies.html")]
struct CompaniesTemplate {
    role: Role,
    companies: Vec<CompanyRow>,
}

struct CompanyRow {
    name: String,
    year: i32,
}

#[derive(Template)]
#[template(path = "employees.html")]
struct EmployeesTemplate {
    role: Role,
    employees: Vec<EmployeeRow>,
}

struct EmployeeRow {
    full_name: String,
    email: String,
    designation: &'static str,
    age: String,
    gender: &'static str,
    date_of_joining: String,
    salary: i32,
}

#[derive(Template)]
#[template(path = "projects.html")]
struct ProjectsTemplate {
    role: Role,
    projects: Vec<ProjectRow>,
}

struct ProjectRow {
    code: String,
    name: String,
    company: String,
    leader: String,
    members: String,
}

#[derive(Template)]
#[template(path = "modules.html")]
struct ModulesTemplate {
    role: Role,
    modules: Vec<ModuleRow>,
}

struct ModuleRow {
    code: String,
    name: String,
    project: String,
    owner: String,
    assignee: String,
    start: String,
    end: String,
}

/// Employee id to full name, for display.
async fn employee_names(state: &SharedState) -> Result<HashMap<Uuid, String>, AppError> {
    Ok(db::employees::list_profiles(&state.pool)
        .await?
        .into_iter()
        .map(|p| (p.employee.id, p.full_name))
        .collect())
}

fn name_of(names: &HashMap<Uuid, String>, id: &Uuid) -> String {
    names.get(id).cloned().unwrap_or_else(|| id.to_string())
}

pub async fn companies(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Html<String>, AppError> {
    auth.require(Entity::Company, Action::View)?;
    let companies = auth
        .scope(Entity::Company)
        .filter(db::companies::list(&state.pool).await?)
        .into_iter()
        .map(|c| CompanyRow {
            name: c.company_name,
            year: c.year,
        })
        .collect();

    super::render(&CompaniesTemplate {
        role: auth.role,
        companies,
    })
}

pub async fn employees(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Html<String>, AppError> {
    auth.require(Entity::Employee, Action::View)?;
    let employees = auth
        .scope(Entity::Employee)
        .filter(db::employees::list_profiles(&state.pool).await?)
        .into_iter()
        .map(|p| EmployeeRow {
            designation: p.role.designation(),
            age: p.employee.age.map(|a| a.to_string()).unwrap_or_default(),
            gender: p.employee.gender.code(),
            date_of_joining: p.employee.date_of_joining.format("%Y-%m-%d").to_string(),
            salary: p.employee.salary,
            full_name: p.full_name,
            email: p.email,
        })
        .collect();

    super::render(&EmployeesTemplate {
        role: auth.role,
        employees,
    })
}

pub async fn projects(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Html<String>, AppError> {
    auth.require(Entity::Project, Action::View)?;
    let visible = auth
        .scope(Entity::Project)
        .filter(db::projects::list(&state.pool).await?);

    let names = employee_names(&state).await?;
    let companies: HashMap<Uuid, String> = db::companies::list(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.company_name))
        .collect();

    let projects = visible
        .into_iter()
        .map(|p| ProjectRow {
            company: name_of(&companies, &p.company_id),
            leader: name_of(&names, &p.team_leader_id),
            members: p
                .team_members
                .iter()
                .map(|id| name_of(&names, id))
                .collect::<Vec<_>>()
                .join(", "),
            code: p.project_code,
            name: p.project_name,
        })
        .collect();

    super::render(&ProjectsTemplate {
        role: auth.role,
        projects,
    })
}

pub async fn modules(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Html<String>, AppError> {
    auth.require(Entity::Module, Action::View)?;
    let visible = auth
        .scope(Entity::Module)
        .filter(db::modules::list(&state.pool).await?);

    let names = employee_names(&state).await?;
    let projects: HashMap<Uuid, String> = db::projects::list(&state.pool)
        .await?
        .into_iter()
        .map(|p| (p.id, p.project_name))
        .collect();

    let modules = visible
        .into_iter()
        .map(|m| ModuleRow {
            project: name_of(&projects, &m.project_id),
            owner: name_of(&names, &m.employee_id),
            assignee: name_of(&names, &m.assignee_id),
            start: m.start_date.format(TIMESTAMP_OUT).to_string(),
            end: m.end_date.format(TIMESTAMP_OUT).to_string(),
            code: m.module_code,
            name: m.module_name,
        })
        .collect();

    super::render(&ModulesTemplate {
        role: auth.role,
        modules,
    })
}
