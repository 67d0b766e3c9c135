use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::extractor::{ACCESS_COOKIE, AuthUser};
use crate::auth::jwt::{Claims, encode_token};
use crate::auth::password;
use crate::db;
use crate::db::users::NewUser;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Employee, EmployeeProfile, Role, User};
use crate::state::SharedState;
use crate::validation::registration::{self, RegistrationInput};
use crate::validation::{ErrorKind, FieldErrors};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct Registered {
    pub user: User,
    pub employee: Employee,
}

#[derive(Serialize)]
pub struct Me {
    pub user: User,
    pub employee: Option<EmployeeProfile>,
}

pub fn auth_cookie(access_token: &str, ttl_minutes: i64) -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(ttl_minutes))
        .build();

    CookieJar::new().add(access)
}

pub fn clear_auth_cookie() -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(access)
}

/// Check credentials and issue an access token for the user.
pub async fn authenticate(
    state: &SharedState,
    email: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    let email = email.trim().to_lowercase();
    let Some(user) = db::users::find_by_email(&state.pool, &email).await? else {
        password::burn(password);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let valid = password::verify(password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let employee = db::employees::find_by_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("User {} has no employee record", user.id)))?;

    let claims = Claims::new(
        user.id,
        employee.id,
        user.role,
        user.can_register,
        state.config.token_ttl_minutes,
    );
    let token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;
    Ok((user, token))
}

/// Create a user and its employee record in one transaction.
///
/// On an empty store the first registration needs no identity, must be an
/// Admin, and receives the registration capability. Afterwards only callers
/// holding that capability may register people.
pub async fn register(
    auth: Option<AuthUser>,
    State(state): State<SharedState>,
    Json(req): Json<RegistrationInput>,
) -> Result<(StatusCode, Json<Registered>), AppError> {
    let bootstrap = db::users::count_all(&state.pool).await? == 0;
    if !bootstrap {
        let actor = auth
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;
        actor.require_register()?;
    }

    let mut valid = registration::validate(req, &state.pool, Utc::now().date_naive()).await?;
    if bootstrap {
        if valid.role != Role::Admin {
            let mut errors = FieldErrors::new();
            errors.add(
                "designation",
                ErrorKind::InvalidChoice,
                "The first account must be an Admin",
            );
            return Err(errors.into());
        }
        valid.can_register = true;
    }

    let pw_hash = password::hash(&valid.password).map_err(AppError::Internal)?;

    // Advisory lock serializes concurrent bootstrap registrations
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    if bootstrap && db::users::count_all(&mut *tx).await? > 0 {
        return Err(AppError::Unauthorized(
            "Missing authentication token".to_string(),
        ));
    }

    let user = db::users::create(
        &mut *tx,
        &NewUser {
            email: &valid.email,
            username: &valid.username,
            full_name: &valid.full_name,
            password_hash: &pw_hash,
            role: valid.role,
            can_register: valid.can_register,
        },
    )
    .await
    .map_err(|e| {
        AppError::from_unique(
            e,
            &[("users_email_key", "email", "Email already exists. Choose a unique name")],
        )
    })?;

    let employee = db::employees::create(&mut *tx, user.id, &valid.profile).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, role = %user.role, "{} registered", user.email);

    audit::log_event(
        &state.pool,
        auth.as_ref(),
        "user.registered",
        "user",
        Some(user.id),
        Some(json!({ "email": user.email, "role": user.role })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(Registered { user, employee })))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let (user, access_token) = authenticate(&state, &req.email, &req.password).await?;

    tracing::debug!(user_id = %user.id, "login");

    let jar = auth_cookie(&access_token, state.config.token_ttl_minutes);
    Ok((
        jar,
        Json(AuthResponse {
            access_token,
            token_type: "Bearer",
            expires_in: state.config.token_ttl_minutes * 60,
        }),
    ))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_auth_cookie(),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

pub async fn me(auth: AuthUser, State(state): State<SharedState>) -> Result<Json<Me>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    let employee = db::employees::find_profile(&state.pool, auth.employee_id).await?;
    Ok(Json(Me { user, employee }))
}
