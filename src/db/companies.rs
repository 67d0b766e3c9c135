use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Company;
use crate::validation::company::ValidCompany;

pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY company_name")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE company_name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, company: &ValidCompany) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "INSERT INTO companies (company_name, year) VALUES ($1, $2) RETURNING *",
    )
    .bind(&company.company_name)
    .bind(company.year)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, company: &ValidCompany) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "UPDATE companies SET company_name = $2, year = $3, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&company.company_name)
    .bind(company.year)
    .fetch_one(pool)
    .await
}

/// Cascades to the company's projects, their modules and memberships.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
