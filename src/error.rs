use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::validation::{ErrorKind, FieldErrors};

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Validation(FieldErrors),
    Conflict(String),
    Internal(String),
    Database(sqlx::Error),
}

impl AppError {
    /// Generic denial; the reason is logged but never returned to the caller.
    pub fn forbidden() -> Self {
        AppError::Forbidden("You do not have permission to perform this action".to_string())
    }

    /// Translate a unique-constraint violation into a field-level
    /// `DuplicateName` failure. `fields` maps constraint names to
    /// `(field, message)`; other errors pass through as database errors.
    pub fn from_unique(err: sqlx::Error, fields: &[(&str, &str, &str)]) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or_default();
                if let Some((_, field, message)) =
                    fields.iter().find(|(name, _, _)| *name == constraint)
                {
                    let mut errors = FieldErrors::new();
                    errors.add(field, ErrorKind::DuplicateName, *message);
                    return AppError::Validation(errors);
                }
            }
        }
        AppError::Database(err)
    }

    /// Map a delete failure. Foreign-key violations become a conflict that
    /// names the underlying cause.
    pub fn from_delete(err: sqlx::Error, what: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Conflict(format!(
                    "Got an error when trying to delete {what}: {}",
                    db_err.message()
                ))
            }
            _ => AppError::Database(err),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {errors}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(errors) => {
                let body = json!({
                    "error": "Validation failed",
                    "fields": errors,
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response();
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}
