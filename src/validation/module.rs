use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use super::{
    Catalog, ErrorKind, FieldErrors, TIMESTAMP_OUT, parse_timestamp, required, required_text,
    title_case,
};
use crate::error::AppError;
use crate::models::Module;

#[derive(Debug, Default, Deserialize)]
pub struct ModuleInput {
    pub module_name: Option<String>,
    pub module_code: Option<String>,
    pub project_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ModuleInput {
    pub fn merged_over(self, current: &Module) -> Self {
        Self {
            module_name: self.module_name.or_else(|| Some(current.module_name.clone())),
            module_code: self.module_code.or_else(|| Some(current.module_code.clone())),
            project_id: self.project_id.or(Some(current.project_id)),
            employee_id: self.employee_id.or(Some(current.employee_id)),
            assignee_id: self.assignee_id.or(Some(current.assignee_id)),
            start_date: self
                .start_date
                .or_else(|| Some(current.start_date.format(TIMESTAMP_OUT).to_string())),
            end_date: self
                .end_date
                .or_else(|| Some(current.end_date.format(TIMESTAMP_OUT).to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidModule {
    pub module_name: String,
    pub module_code: String,
    pub project_id: Uuid,
    pub employee_id: Uuid,
    pub assignee_id: Uuid,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

const TIMESTAMP_HELP: &str = "It must be in YYYY-MM-DDTHH:MM or DD-MM-YYYY HH:MM 24-hour format.";

fn timestamp(errors: &mut FieldErrors, field: &str, raw: Option<String>) -> Option<NaiveDateTime> {
    let raw = required_text(errors, field, raw)?;
    let parsed = parse_timestamp(&raw);
    if parsed.is_none() {
        errors.add(field, ErrorKind::InvalidFormat, TIMESTAMP_HELP);
    }
    parsed
}

pub async fn validate<C: Catalog + ?Sized>(
    input: ModuleInput,
    editing: Option<Uuid>,
    catalog: &C,
) -> Result<ValidModule, AppError> {
    let mut errors = FieldErrors::new();

    let name = required_text(&mut errors, "module_name", input.module_name).map(|n| title_case(&n));

    let code = required_text(&mut errors, "module_code", input.module_code);
    if let Some(code) = &code {
        if let Some(existing) = catalog.module_with_code(code).await? {
            if Some(existing) != editing {
                errors.add(
                    "module_code",
                    ErrorKind::DuplicateName,
                    format!("Module code {code} is already in use"),
                );
            }
        }
    }

    let project_id = required(&mut errors, "project_id", input.project_id);
    if let Some(project_id) = project_id {
        if !catalog.project_exists(project_id).await? {
            errors.add("project_id", ErrorKind::InvalidReference, "Select a valid project");
        }
    }

    let owner = required(&mut errors, "employee_id", input.employee_id);
    let assignee = required(&mut errors, "assignee_id", input.assignee_id);
    for (field, id) in [("employee_id", owner), ("assignee_id", assignee)] {
        if let Some(id) = id {
            if !catalog.missing_employees(&[id]).await?.is_empty() {
                errors.add(field, ErrorKind::InvalidReference, "Select a valid employee");
            }
        }
    }
    if let Some(owner) = owner {
        if let Some(owned) = catalog.module_owned_by(owner).await? {
            if Some(owned) != editing {
                errors.add(
                    "employee_id",
                    ErrorKind::DuplicateName,
                    "This employee already owns a module",
                );
            }
        }
    }

    let start = timestamp(&mut errors, "start_date", input.start_date);
    let end = timestamp(&mut errors, "end_date", input.end_date);
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.add(
                "end_date",
                ErrorKind::InvalidRange,
                "End date and time should be later than start date",
            );
        }
    }

    match (name, code, project_id, owner, assignee, start, end) {
        (
            Some(module_name),
            Some(module_code),
            Some(project_id),
            Some(employee_id),
            Some(assignee_id),
            Some(start_date),
            Some(end_date),
        ) if errors.is_empty() => Ok(ValidModule {
            module_name,
            module_code,
            project_id,
            employee_id,
            assignee_id,
            start_date,
            end_date,
        }),
        _ => Err(AppError::Validation(errors)),
    }
}
