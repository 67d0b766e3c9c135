use serde::Deserialize;
use uuid::Uuid;

use super::{Catalog, ErrorKind, FieldErrors, REQUIRED, required, required_text, title_case};
use crate::error::AppError;
use crate::models::Project;

#[derive(Debug, Default, Deserialize)]
pub struct ProjectInput {
    pub company_id: Option<Uuid>,
    pub project_code: Option<String>,
    pub project_name: Option<String>,
    pub team_leader_id: Option<Uuid>,
    pub team_members: Option<Vec<Uuid>>,
}

impl ProjectInput {
    pub fn merged_over(self, current: &Project) -> Self {
        Self {
            company_id: self.company_id.or(Some(current.company_id)),
            project_code: self.project_code.or_else(|| Some(current.project_code.clone())),
            project_name: self.project_name.or_else(|| Some(current.project_name.clone())),
            team_leader_id: self.team_leader_id.or(Some(current.team_leader_id)),
            team_members: self.team_members.or_else(|| Some(current.team_members.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidProject {
    pub company_id: Uuid,
    pub project_code: String,
    pub project_name: String,
    pub team_leader_id: Uuid,
    /// Deduplicated, in submission order.
    pub team_members: Vec<Uuid>,
}

pub async fn validate<C: Catalog + ?Sized>(
    input: ProjectInput,
    editing: Option<Uuid>,
    catalog: &C,
) -> Result<ValidProject, AppError> {
    let mut errors = FieldErrors::new();

    let company_id = required(&mut errors, "company_id", input.company_id);
    if let Some(company_id) = company_id {
        if !catalog.company_exists(company_id).await? {
            errors.add("company_id", ErrorKind::InvalidReference, "Select a valid company");
        }
    }

    let code = required_text(&mut errors, "project_code", input.project_code);
    if let Some(code) = &code {
        if let Some(existing) = catalog.project_with_code(code).await? {
            if Some(existing) != editing {
                errors.add(
                    "project_code",
                    ErrorKind::DuplicateName,
                    format!("Project code {code} is already in use"),
                );
            }
        }
    }

    let name = required_text(&mut errors, "project_name", input.project_name).map(|n| title_case(&n));
    if let (Some(name), Some(company_id)) = (&name, company_id) {
        let clashes = catalog.projects_named(company_id, name).await?;
        if clashes.iter().any(|id| Some(*id) != editing) {
            errors.add(
                "project_name",
                ErrorKind::DuplicateName,
                format!("There is already a project with name: {name}"),
            );
        }
    }

    let mut members: Vec<Uuid> = Vec::new();
    for id in input.team_members.unwrap_or_default() {
        if !members.contains(&id) {
            members.push(id);
        }
    }
    if members.is_empty() {
        errors.add("team_members", ErrorKind::InvalidFormat, REQUIRED);
    } else {
        let missing = catalog.missing_employees(&members).await?;
        if !missing.is_empty() {
            errors.add(
                "team_members",
                ErrorKind::InvalidReference,
                format!("Unknown employees: {}", join_ids(&missing)),
            );
        }
    }

    // The submitted member set is authoritative.
    let leader = required(&mut errors, "team_leader_id", input.team_leader_id);
    if let Some(leader) = leader {
        if !members.contains(&leader) {
            errors.add(
                "team_leader_id",
                ErrorKind::InvalidReference,
                "The team leader must be one of the selected team members",
            );
        }
    }

    match (company_id, code, name, leader) {
        (Some(company_id), Some(project_code), Some(project_name), Some(team_leader_id))
            if errors.is_empty() =>
        {
            Ok(ValidProject {
                company_id,
                project_code,
                project_name,
                team_leader_id,
                team_members: members,
            })
        }
        _ => Err(AppError::Validation(errors)),
    }
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::testing::{MemoryCatalog, field_errors};

    struct Fixture {
        catalog: MemoryCatalog,
        company: Uuid,
        alice: Uuid,
        bob: Uuid,
    }

    fn fixture() -> Fixture {
        let mut catalog = MemoryCatalog::default();
        let company = Uuid::now_v7();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        catalog.companies.insert(company, "Acme".to_string());
        catalog.employees = vec![alice, bob];
        Fixture {
            catalog,
            company,
            alice,
            bob,
        }
    }

    fn input(f: &Fixture, name: &str, code: &str, leader: Uuid, members: Vec<Uuid>) -> ProjectInput {
        ProjectInput {
            company_id: Some(f.company),
            project_code: Some(code.to_string()),
            project_name: Some(name.to_string()),
            team_leader_id: Some(leader),
            team_members: Some(members),
        }
    }

    #[tokio::test]
    async fn accepts_leader_among_members() {
        let f = fixture();
        let valid = validate(
            input(&f, "billing revamp", "BR-1", f.alice, vec![f.alice, f.bob, f.alice]),
            None,
            &f.catalog,
        )
        .await
        .unwrap();
        assert_eq!(valid.project_name, "Billing Revamp");
        assert_eq!(valid.team_members, vec![f.alice, f.bob]);
        assert!(valid.team_members.contains(&valid.team_leader_id));
    }

    #[tokio::test]
    async fn rejects_leader_outside_members() {
        let f = fixture();
        let errors = field_errors(
            validate(input(&f, "Billing", "BR-1", f.alice, vec![f.bob]), None, &f.catalog).await,
        );
        assert!(errors.has("team_leader_id", ErrorKind::InvalidReference));
    }

    #[tokio::test]
    async fn rejects_duplicate_name_in_same_company() {
        let mut f = fixture();
        f.catalog.projects.insert(
            Uuid::now_v7(),
            (f.company, "Billing".to_string(), "OLD-1".to_string()),
        );
        let errors = field_errors(
            validate(input(&f, "BILLING", "BR-2", f.alice, vec![f.alice]), None, &f.catalog).await,
        );
        assert!(errors.has("project_name", ErrorKind::DuplicateName));
    }

    #[tokio::test]
    async fn same_name_in_other_company_is_fine() {
        let mut f = fixture();
        let other = Uuid::now_v7();
        f.catalog.companies.insert(other, "Globex".to_string());
        f.catalog.projects.insert(
            Uuid::now_v7(),
            (other, "Billing".to_string(), "GX-1".to_string()),
        );
        assert!(
            validate(input(&f, "billing", "BR-2", f.alice, vec![f.alice]), None, &f.catalog)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn editing_excludes_itself_from_uniqueness() {
        let mut f = fixture();
        let id = Uuid::now_v7();
        f.catalog
            .projects
            .insert(id, (f.company, "Billing".to_string(), "BR-1".to_string()));
        assert!(
            validate(input(&f, "billing", "BR-1", f.alice, vec![f.alice]), Some(id), &f.catalog)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn rejects_unknown_references_and_empty_members() {
        let f = fixture();
        let stranger = Uuid::now_v7();
        let errors = field_errors(
            validate(
                ProjectInput {
                    company_id: Some(Uuid::now_v7()),
                    project_code: Some("X".to_string()),
                    project_name: Some("X".to_string()),
                    team_leader_id: Some(stranger),
                    team_members: Some(vec![stranger]),
                },
                None,
                &f.catalog,
            )
            .await,
        );
        assert!(errors.has("company_id", ErrorKind::InvalidReference));
        assert!(errors.has("team_members", ErrorKind::InvalidReference));

        let errors = field_errors(
            validate(input(&f, "Y", "Y-1", f.alice, vec![]), None, &f.catalog).await,
        );
        assert!(errors.has("team_members", ErrorKind::InvalidFormat));
    }
}
