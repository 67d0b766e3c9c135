use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Employee, EmployeeProfile};
use crate::validation::employee::ValidEmployee;

const SELECT_PROFILE: &str = "SELECT e.*, u.email, u.full_name, u.role
     FROM employees e JOIN users u ON u.id = e.user_id";

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    profile: &ValidEmployee,
) -> Result<Employee, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "INSERT INTO employees (user_id, age, date_of_joining, gender, salary)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(user_id)
    .bind(profile.age)
    .bind(profile.date_of_joining)
    .bind(profile.gender)
    .bind(profile.salary)
    .fetch_one(executor)
    .await
}

pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_profile(pool: &PgPool, id: Uuid) -> Result<Option<EmployeeProfile>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeProfile>(&format!("{SELECT_PROFILE} WHERE e.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_profiles(pool: &PgPool) -> Result<Vec<EmployeeProfile>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeProfile>(&format!("{SELECT_PROFILE} ORDER BY u.full_name"))
        .fetch_all(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    profile: &ValidEmployee,
) -> Result<Employee, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "UPDATE employees SET age = $2, date_of_joining = $3, gender = $4, salary = $5,
         updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(profile.age)
    .bind(profile.date_of_joining)
    .bind(profile.gender)
    .bind(profile.salary)
    .fetch_one(pool)
    .await
}

/// The subset of `ids` without an employee row.
pub async fn missing(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM UNNEST($1::uuid[]) AS wanted(id)
         WHERE NOT EXISTS (SELECT 1 FROM employees e WHERE e.id = wanted.id)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}
