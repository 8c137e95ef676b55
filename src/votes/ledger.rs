//! Vote ledger: per-voter record of ideas already voted for.
//!
//! One row per (voter, idea) pair; presence means "has voted". Rows are
//! append-only — there is no update or delete path, so a recorded vote can
//! never be cleared or overwritten.

use std::collections::HashSet;

use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// A new ledger row was created for this (voter, idea) pair.
    Recorded,
    /// The pair was already present; nothing was written.
    AlreadyMarked,
}

/// The set of idea ids this voter has already voted for. Empty set for a
/// voter with no ledger rows yet.
pub async fn get(pool: &PgPool, voter_id: i64) -> Result<HashSet<i64>, AppError> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT idea_id FROM vote_ledger WHERE voter_id = $1")
        .bind(voter_id)
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Idempotently record that `voter_id` voted for `idea_id`.
///
/// The insert is conditioned on the (voter, idea) primary key: under two
/// concurrent attempts exactly one sees `Recorded`, the other
/// `AlreadyMarked`. Existing rows are never touched (merge, not replace).
///
/// Generic over the executor so the coordinator can run it inside the same
/// transaction as the tally increment.
pub async fn mark_voted<'e, E>(
    executor: E,
    voter_id: i64,
    idea_id: i64,
) -> Result<MarkOutcome, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let result = sqlx::query(
        "INSERT INTO vote_ledger (voter_id, idea_id, created_at) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (voter_id, idea_id) DO NOTHING",
    )
    .bind(voter_id)
    .bind(idea_id)
    .bind(&now)
    .execute(executor)
    .await?;

    if result.rows_affected() == 1 {
        Ok(MarkOutcome::Recorded)
    } else {
        Ok(MarkOutcome::AlreadyMarked)
    }
}
