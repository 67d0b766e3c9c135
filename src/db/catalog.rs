use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::validation::Catalog;

#[async_trait]
impl Catalog for PgPool {
    async fn company_named(&self, name: &str) -> Result<Option<Uuid>, sqlx::Error> {
        Ok(db::companies::find_by_name(self, name).await?.map(|c| c.id))
    }

    async fn company_exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(db::companies::find_by_id(self, id).await?.is_some())
    }

    async fn projects_named(&self, company_id: Uuid, name: &str) -> Result<Vec<Uuid>, sqlx::Error> {
        db::projects::ids_named(self, company_id, name).await
    }

    async fn project_with_code(&self, code: &str) -> Result<Option<Uuid>, sqlx::Error> {
        db::projects::find_by_code(self, code).await
    }

    async fn project_exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        db::projects::exists(self, id).await
    }

    async fn missing_employees(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
        db::employees::missing(self, ids).await
    }

    async fn module_with_code(&self, code: &str) -> Result<Option<Uuid>, sqlx::Error> {
        db::modules::find_by_code(self, code).await
    }

    async fn module_owned_by(&self, employee_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        db::modules::find_by_owner(self, employee_id).await
    }

    async fn user_with_email(&self, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
        Ok(db::users::find_by_email(self, email).await?.map(|u| u.id))
    }
}
