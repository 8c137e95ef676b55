use sqlx::PgPool;

use super::types::*;
use crate::errors::AppError;

const SELECT_IDEA: &str = "SELECT id, title, description, kind, region, team_name, \
                                  votes, status, submitted_by, created_at \
                           FROM ideas";

/// Empty or whitespace-only optional fields are stored as NULL.
fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Create a new idea from a submission. The vote counter starts at zero and
/// the status at `pending`; neither is caller-controlled.
pub async fn create(pool: &PgPool, new_idea: &NewIdea, submitted_by: i64) -> Result<Idea, AppError> {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let idea = sqlx::query_as::<_, Idea>(
        "INSERT INTO ideas (title, description, kind, region, team_name, \
                            votes, status, submitted_by, created_at) \
         VALUES ($1, $2, $3, $4, $5, 0, 'pending', $6, $7) \
         RETURNING id, title, description, kind, region, team_name, \
                   votes, status, submitted_by, created_at",
    )
    .bind(new_idea.title.trim())
    .bind(new_idea.description.trim())
    .bind(&new_idea.kind)
    .bind(normalized(&new_idea.region))
    .bind(normalized(&new_idea.team_name))
    .bind(submitted_by)
    .bind(&now)
    .fetch_one(pool)
    .await?;
    Ok(idea)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Idea>, AppError> {
    let idea = sqlx::query_as::<_, Idea>(&format!("{SELECT_IDEA} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(idea)
}

/// All ideas, highest tally first. Handlers apply kind/region/status
/// filters and pagination on top of this.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Idea>, AppError> {
    let ideas = sqlx::query_as::<_, Idea>(&format!("{SELECT_IDEA} ORDER BY votes DESC, id"))
        .fetch_all(pool)
        .await?;
    Ok(ideas)
}

/// Leaderboard: top N ideas by tally.
pub async fn find_top(pool: &PgPool, limit: i64) -> Result<Vec<Idea>, AppError> {
    let ideas = sqlx::query_as::<_, Idea>(&format!(
        "{SELECT_IDEA} ORDER BY votes DESC, id LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(ideas)
}

/// Idea and vote totals per region, busiest regions first. Ideas without a
/// region (team ideas may omit one) are not part of any regional rollup.
pub async fn region_summary(pool: &PgPool) -> Result<Vec<RegionSummary>, AppError> {
    let rows = sqlx::query_as::<_, RegionSummary>(
        "SELECT region, COUNT(*) AS idea_count, COALESCE(SUM(votes), 0)::BIGINT AS total_votes \
         FROM ideas \
         WHERE region IS NOT NULL \
         GROUP BY region \
         ORDER BY total_votes DESC, region",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
