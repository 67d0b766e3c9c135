use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Module;
use crate::validation::module::ValidModule;

pub async fn list(pool: &PgPool) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>("SELECT * FROM modules ORDER BY start_date")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM modules WHERE module_code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_owner(pool: &PgPool, employee_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM modules WHERE employee_id = $1")
        .bind(employee_id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, module: &ValidModule) -> Result<Module, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "INSERT INTO modules
         (module_name, module_code, project_id, employee_id, assignee_id, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&module.module_name)
    .bind(&module.module_code)
    .bind(module.project_id)
    .bind(module.employee_id)
    .bind(module.assignee_id)
    .bind(module.start_date)
    .bind(module.end_date)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, module: &ValidModule) -> Result<Module, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "UPDATE modules SET module_name = $2, module_code = $3, project_id = $4,
         employee_id = $5, assignee_id = $6, start_date = $7, end_date = $8,
         updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&module.module_name)
    .bind(&module.module_code)
    .bind(module.project_id)
    .bind(module.employee_id)
    .bind(module.assignee_id)
    .bind(module.start_date)
    .bind(module.end_date)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM modules WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
