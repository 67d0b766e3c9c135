//! Field and cross-field checks run before any record is written.
//!
//! Every check normalizes first and then tests uniqueness or range against
//! the normalized value, which is also the value that gets persisted.
//! Failures for one submission are collected into [`FieldErrors`] so the
//! caller sees every problem at once.

pub mod company;
pub mod employee;
pub mod module;
pub mod project;
pub mod registration;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DuplicateName,
    OutOfRange,
    InvalidRange,
    InvalidReference,
    InvalidFormat,
    InvalidChoice,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Failures keyed by field name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<FieldError>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, kind: ErrorKind, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(FieldError {
            kind,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str, kind: ErrorKind) -> bool {
        self.0
            .get(field)
            .is_some_and(|errs| errs.iter().any(|e| e.kind == kind))
    }

    /// `Ok(())` when nothing failed, otherwise the collected failures.
    pub fn finish(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errs) in &self.0 {
            for err in errs {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {}", err.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Read-only view of the store that uniqueness and reference checks need.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn company_named(&self, name: &str) -> Result<Option<Uuid>, sqlx::Error>;
    async fn company_exists(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    async fn projects_named(&self, company_id: Uuid, name: &str)
        -> Result<Vec<Uuid>, sqlx::Error>;
    async fn project_with_code(&self, code: &str) -> Result<Option<Uuid>, sqlx::Error>;
    async fn project_exists(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    /// The subset of `ids` that has no employee record.
    async fn missing_employees(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error>;
    async fn module_with_code(&self, code: &str) -> Result<Option<Uuid>, sqlx::Error>;
    async fn module_owned_by(&self, employee_id: Uuid) -> Result<Option<Uuid>, sqlx::Error>;
    async fn user_with_email(&self, email: &str) -> Result<Option<Uuid>, sqlx::Error>;
}

pub const REQUIRED: &str = "This field is required.";

/// Title-case normalization: the first letter of every run of letters is
/// upper-cased and the rest lower-cased. Applying it twice changes nothing.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                let mut upper = c.to_uppercase();
                if let Some(head) = upper.next() {
                    out.push(head);
                }
                for rest in upper {
                    out.extend(rest.to_lowercase());
                }
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Record `REQUIRED` against `field` if the value is absent or blank.
pub fn required_text(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.add(field, ErrorKind::InvalidFormat, REQUIRED);
            None
        }
    }
}

pub fn required<T>(errors: &mut FieldErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.add(field, ErrorKind::InvalidFormat, REQUIRED);
    }
    value
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];

/// Canonical text form used when a stored timestamp is merged back into an input.
pub const TIMESTAMP_OUT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
