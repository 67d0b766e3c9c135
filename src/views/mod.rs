pub mod auth;
pub mod pages;

use askama::Template;
use axum::Router;
use axum::response::Html;
use axum::routing::{get, post};

use crate::error::AppError;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Auth views
        .route("/", get(auth::login_page))
        .route("/auth/login", get(auth::login_page).post(auth::login_submit))
        .route("/auth/logout", post(auth::logout))
        // Read-only lists
        .route("/companies", get(pages::companies))
        .route("/employees", get(pages::employees))
        .route("/projects", get(pages::projects))
        .route("/modules", get(pages::modules))
}

fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template error: {e}")))
}
