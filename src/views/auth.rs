use askama::Template;
use axum::Form;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::extractor::{ACCESS_COOKIE, identify};
use crate::error::AppError;
use crate::middleware::auth_redirect::is_plain_path_char;
use crate::routes::auth::{auth_cookie, authenticate, clear_auth_cookie};
use crate::state::SharedState;

const HOME: &str = "/projects";

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    next: String,
    email: String,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: String,
}

/// Only same-site absolute paths made of plain characters are followed
/// after login. Browsers read `/\host` as `//host`.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && path.chars().all(is_plain_path_char) =>
        {
            path
        }
        _ => HOME,
    }
}

pub async fn login_page(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(q): Query<LoginQuery>,
) -> Result<Response, AppError> {
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        if identify(cookie.value(), &state).await.is_ok() {
            return Ok(Redirect::to(safe_next(q.next.as_deref())).into_response());
        }
    }

    let template = LoginTemplate {
        next: safe_next(q.next.as_deref()).to_string(),
        email: String::new(),
        error: None,
    };
    Ok(super::render(&template)?.into_response())
}

pub async fn login_submit(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = safe_next(Some(&form.next)).to_string();
    match authenticate(&state, &form.email, &form.password).await {
        Ok((user, token)) => {
            tracing::debug!(user_id = %user.id, "page login");
            let jar = auth_cookie(&token, state.config.token_ttl_minutes);
            Ok((jar, Redirect::to(&next)).into_response())
        }
        Err(AppError::Unauthorized(message)) => {
            let template = LoginTemplate {
                next,
                email: form.email,
                error: Some(message),
            };
            Ok((StatusCode::OK, super::render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn logout() -> impl IntoResponse {
    (clear_auth_cookie(), Redirect::to("/auth/login"))
}

#[cfg(test)]
mod tests {
    use super::safe_next;

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/modules")), "/modules");
        assert_eq!(safe_next(Some("//evil.example")), "/projects");
        assert_eq!(safe_next(Some("https://evil.example")), "/projects");
        assert_eq!(safe_next(Some("/\\evil.example")), "/projects");
        assert_eq!(safe_next(Some("/modules?x=1")), "/projects");
        assert_eq!(safe_next(None), "/projects");
    }
}
