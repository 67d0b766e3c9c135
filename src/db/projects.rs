use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Project;
use crate::validation::project::ValidProject;

const SELECT: &str = "SELECT p.id, p.company_id, p.project_code, p.project_name, p.team_leader_id,
     ARRAY(SELECT m.employee_id FROM project_members m
           WHERE m.project_id = p.id ORDER BY m.employee_id) AS team_members,
     p.created_at, p.updated_at
     FROM projects p";

pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!("{SELECT} ORDER BY p.project_name"))
        .fetch_all(pool)
        .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!("{SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM projects WHERE project_code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
}

pub async fn ids_named(pool: &PgPool, company_id: Uuid, name: &str) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM projects WHERE company_id = $1 AND project_name = $2",
    )
    .bind(company_id)
    .bind(name)
    .fetch_all(pool)
    .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Insert the project and its member set. Run inside a transaction.
pub async fn create(conn: &mut PgConnection, project: &ValidProject) -> Result<Project, sqlx::Error> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO projects (company_id, project_code, project_name, team_leader_id)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(project.company_id)
    .bind(&project.project_code)
    .bind(&project.project_name)
    .bind(project.team_leader_id)
    .fetch_one(&mut *conn)
    .await?;

    replace_members(conn, id, &project.team_members).await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Overwrite the project row and its member set. Run inside a transaction.
pub async fn update(
    conn: &mut PgConnection,
    id: Uuid,
    project: &ValidProject,
) -> Result<Project, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE projects SET company_id = $2, project_code = $3, project_name = $4,
         team_leader_id = $5, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(project.company_id)
    .bind(&project.project_code)
    .bind(&project.project_name)
    .bind(project.team_leader_id)
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }

    replace_members(conn, id, &project.team_members).await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

async fn replace_members(
    conn: &mut PgConnection,
    project_id: Uuid,
    members: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM project_members WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query(
        "INSERT INTO project_members (project_id, employee_id)
         SELECT $1, UNNEST($2::uuid[])",
    )
    .bind(project_id)
    .bind(members)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Cascades to the project's modules and memberships.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
