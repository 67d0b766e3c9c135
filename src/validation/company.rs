use serde::Deserialize;
use uuid::Uuid;

use super::{Catalog, ErrorKind, FieldErrors, required, required_text, title_case};
use crate::error::AppError;
use crate::models::Company;

#[derive(Debug, Default, Deserialize)]
pub struct CompanyInput {
    pub company_name: Option<String>,
    pub year: Option<i32>,
}

impl CompanyInput {
    /// Fill omitted fields from the stored record.
    pub fn merged_over(self, current: &Company) -> Self {
        Self {
            company_name: self.company_name.or_else(|| Some(current.company_name.clone())),
            year: self.year.or(Some(current.year)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidCompany {
    pub company_name: String,
    pub year: i32,
}

/// Accepts `y` iff 1800 < y < 2100.
pub fn year_in_range(year: i32) -> bool {
    1800 < year && year < 2100
}

pub async fn validate<C: Catalog + ?Sized>(
    input: CompanyInput,
    editing: Option<Uuid>,
    catalog: &C,
) -> Result<ValidCompany, AppError> {
    let mut errors = FieldErrors::new();

    let name = required_text(&mut errors, "company_name", input.company_name).map(|n| title_case(&n));
    if let Some(name) = &name {
        if let Some(existing) = catalog.company_named(name).await? {
            if Some(existing) != editing {
                errors.add(
                    "company_name",
                    ErrorKind::DuplicateName,
                    "Company already exists. Choose a unique name",
                );
            }
        }
    }

    let year = required(&mut errors, "year", input.year);
    if let Some(year) = year {
        if !year_in_range(year) {
            errors.add("year", ErrorKind::OutOfRange, "Year Range 1801-2099");
        }
    }

    match (name, year) {
        (Some(company_name), Some(year)) if errors.is_empty() => {
            Ok(ValidCompany { company_name, year })
        }
        _ => Err(AppError::Validation(errors)),
    }
}
