use chrono::NaiveDate;
use serde::Deserialize;

use super::employee::{self, EmployeeInput, ValidEmployee};
use super::{Catalog, ErrorKind, FieldErrors, REQUIRED, required_text, title_case};
use crate::error::AppError;
use crate::models::Role;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationInput {
    pub email: Option<String>,
    pub full_name: Option<String>,
    /// One of `Admin`, `Team Leader`, `Employee`.
    pub designation: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    #[serde(default)]
    pub can_register: bool,
    #[serde(flatten)]
    pub profile: EmployeeInput,
}

#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub password: String,
    pub can_register: bool,
    pub profile: ValidEmployee,
}

/// Lower-cased email, or `None` if it has no `local@domain.tld` shape.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    let well_formed = !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);
    well_formed.then_some(email)
}

/// Username is the local part of the normalized email; not unique.
pub fn username_for(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

/// Trimmed, letters separated by single spaces, title-cased.
pub fn normalize_full_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    let well_formed = !name.is_empty()
        && name.chars().all(|c| c.is_alphabetic() || c == ' ')
        && !name.contains("  ");
    well_formed.then(|| title_case(name))
}

pub async fn validate<C: Catalog + ?Sized>(
    input: RegistrationInput,
    catalog: &C,
    today: NaiveDate,
) -> Result<ValidRegistration, AppError> {
    let mut errors = FieldErrors::new();

    let email = match required_text(&mut errors, "email", input.email) {
        None => None,
        Some(raw) => match normalize_email(&raw) {
            None => {
                errors.add("email", ErrorKind::InvalidFormat, "Enter a valid email address");
                None
            }
            Some(email) => {
                if catalog.user_with_email(&email).await?.is_some() {
                    errors.add(
                        "email",
                        ErrorKind::DuplicateName,
                        "Email already exists. Choose a unique name",
                    );
                }
                Some(email)
            }
        },
    };

    let full_name = required_text(&mut errors, "full_name", input.full_name).and_then(|raw| {
        let normalized = normalize_full_name(&raw);
        if normalized.is_none() {
            errors.add(
                "full_name",
                ErrorKind::InvalidFormat,
                "Enter correct name using alphabets and single space",
            );
        }
        normalized
    });

    let role = required_text(&mut errors, "designation", input.designation).and_then(|raw| {
        let role = Role::from_designation(&raw);
        if role.is_none() {
            errors.add(
                "designation",
                ErrorKind::InvalidChoice,
                format!("Choose one of: {}", Role::DESIGNATIONS.join(", ")),
            );
        }
        role
    });

    let password = match input.password.filter(|pw| !pw.is_empty()) {
        None => {
            errors.add("password", ErrorKind::InvalidFormat, REQUIRED);
            None
        }
        Some(pw) if pw.chars().count() < MIN_PASSWORD_LEN => {
            errors.add(
                "password",
                ErrorKind::InvalidFormat,
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
            None
        }
        Some(pw) if input.password_confirmation.as_deref() != Some(pw.as_str()) => {
            errors.add(
                "password_confirmation",
                ErrorKind::InvalidFormat,
                "The two password fields didn't match.",
            );
            None
        }
        Some(pw) => Some(pw),
    };

    if input.can_register && role.is_some_and(|r| r != Role::Admin) {
        errors.add(
            "can_register",
            ErrorKind::InvalidChoice,
            "Only Admin accounts may be allowed to register people",
        );
    }

    let profile = employee::check(input.profile, &mut errors, today);

    match (email, full_name, role, password) {
        (Some(email), Some(full_name), Some(role), Some(password)) if errors.is_empty() => {
            Ok(ValidRegistration {
                username: username_for(&email),
                email,
                full_name,
                role,
                password,
                can_register: input.can_register,
                profile,
            })
        }
        _ => Err(AppError::Validation(errors)),
    }
}
