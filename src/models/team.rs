use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;

/// A team that team ideas can reference by name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub region: String,
    pub members: Vec<String>,
    pub created_at: String,
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    region: &str,
    members: &[String],
) -> Result<Team, AppError> {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let team = sqlx::query_as::<_, Team>(
        "INSERT INTO teams (name, region, members, created_at) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, name, region, members, created_at",
    )
    .bind(name)
    .bind(region)
    .bind(members)
    .bind(&now)
    .fetch_one(pool)
    .await?;
    Ok(team)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Team>, AppError> {
    let teams = sqlx::query_as::<_, Team>(
        "SELECT id, name, region, members, created_at FROM teams ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(teams)
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Team>, AppError> {
    let team = sqlx::query_as::<_, Team>(
        "SELECT id, name, region, members, created_at FROM teams WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(team)
}
