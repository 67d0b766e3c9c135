use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

/// Redirect 401 responses on browser pages to the login page, remembering
/// where the user was headed.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let wanted = req.uri().path().to_string();
    let response = next.run(req).await;
    if response.status() != StatusCode::UNAUTHORIZED {
        return response;
    }
    if wanted.starts_with('/') && wanted != "/auth/login" && wanted.chars().all(is_plain_path_char) {
        Redirect::to(&format!("/auth/login?next={wanted}")).into_response()
    } else {
        Redirect::to("/auth/login").into_response()
    }
}

pub(crate) fn is_plain_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_')
}
