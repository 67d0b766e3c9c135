pub mod audit;
pub mod auth;
pub mod companies;
pub mod employees;
pub mod modules;
pub mod projects;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        // Companies
        .route(
            "/api/v1/companies",
            get(companies::list).post(companies::create),
        )
        .route(
            "/api/v1/companies/{id}",
            get(companies::get)
                .put(companies::update)
                .delete(companies::delete),
        )
        // Employees
        .route("/api/v1/employees", get(employees::list))
        .route(
            "/api/v1/employees/{id}",
            get(employees::get)
                .put(employees::update)
                .delete(employees::delete),
        )
        // Projects
        .route("/api/v1/projects", get(projects::list).post(projects::create))
        .route(
            "/api/v1/projects/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        // Modules
        .route("/api/v1/modules", get(modules::list).post(modules::create))
        .route(
            "/api/v1/modules/{id}",
            get(modules::get)
                .put(modules::update)
                .delete(modules::delete),
        )
        // Audit
        .route("/api/v1/audit", get(audit::list))
}
