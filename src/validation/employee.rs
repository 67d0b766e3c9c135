use chrono::NaiveDate;
use serde::Deserialize;

use super::{ErrorKind, FieldErrors, parse_date};
use crate::error::AppError;
use crate::models::{Employee, Gender};

/// Editable profile fields. Absent fields fall back to the profile defaults.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeInput {
    pub age: Option<i32>,
    /// `YYYY-MM-DD` or `DD-MM-YYYY`.
    pub date_of_joining: Option<String>,
    pub gender: Option<String>,
    pub salary: Option<i32>,
}

impl EmployeeInput {
    pub fn merged_over(self, current: &Employee) -> Self {
        Self {
            age: self.age.or(current.age),
            date_of_joining: self
                .date_of_joining
                .or_else(|| Some(current.date_of_joining.format("%Y-%m-%d").to_string())),
            gender: self.gender.or_else(|| Some(current.gender.code().to_string())),
            salary: self.salary.or(Some(current.salary)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidEmployee {
    pub age: Option<i32>,
    pub date_of_joining: NaiveDate,
    pub gender: Gender,
    pub salary: i32,
}

/// Accepts `a` iff 17 < a < 66.
pub fn age_in_range(age: i32) -> bool {
    17 < age && age < 66
}

/// Check the profile fields, recording failures into `errors`.
/// `today` is the default joining date.
pub fn check(input: EmployeeInput, errors: &mut FieldErrors, today: NaiveDate) -> ValidEmployee {
    if let Some(age) = input.age {
        if !age_in_range(age) {
            errors.add("age", ErrorKind::OutOfRange, "Incorrect age. Check the range");
        }
    }

    let date_of_joining = match input.date_of_joining.as_deref() {
        None => today,
        Some(raw) => parse_date(raw).unwrap_or_else(|| {
            errors.add(
                "date_of_joining",
                ErrorKind::InvalidFormat,
                "It must be in DD-MM-YYYY or YYYY-MM-DD format.",
            );
            today
        }),
    };

    let gender = match input.gender.as_deref().map(str::trim) {
        None => Gender::Male,
        Some(code) => Gender::from_code(code).unwrap_or_else(|| {
            errors.add("gender", ErrorKind::InvalidChoice, "Choose M or F");
            Gender::Male
        }),
    };

    let salary = input.salary.unwrap_or(0);
    if salary < 0 {
        errors.add("salary", ErrorKind::OutOfRange, "Salary cannot be negative");
    }

    ValidEmployee {
        age: input.age,
        date_of_joining,
        gender,
        salary,
    }
}

pub fn validate(input: EmployeeInput, today: NaiveDate) -> Result<ValidEmployee, AppError> {
    let mut errors = FieldErrors::new();
    let valid = check(input, &mut errors, today);
    errors.finish()?;
    Ok(valid)
}
