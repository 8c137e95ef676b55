//! Vote coordinator: enforces at-most-one-vote-per-idea-per-voter and
//! applies the tally increment.
//!
//! The duplicate check and the increment run in one transaction. The
//! ledger insert is the precondition: it only succeeds if no row exists
//! for the (voter, idea) pair, so two overlapping attempts by the same
//! voter on different sessions resolve to exactly one success. The tally
//! update is a storage-tier `votes = votes + 1`, never a read-modify-write
//! computed client-side, so concurrent voters on the same idea cannot lose
//! increments.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::handlers::feed_handlers::{self, SubscriberMap};
use crate::models::idea;
use crate::votes::ledger::{self, MarkOutcome};

/// Cast a vote by `voter_id` for `idea_id` and republish the new tally.
///
/// The caller resolves the session identity first; this function assumes
/// `voter_id` is an authenticated principal. Success carries no tally —
/// viewers observe the updated count through the live feed.
pub async fn cast_vote(
    pool: &PgPool,
    subscribers: &SubscriberMap,
    voter_id: i64,
    idea_id: i64,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    match ledger::mark_voted(&mut *tx, voter_id, idea_id).await {
        Ok(MarkOutcome::Recorded) => {}
        // Dropping the transaction rolls back; nothing was mutated.
        Ok(MarkOutcome::AlreadyMarked) => return Err(AppError::DuplicateVote),
        Err(AppError::Db(e)) if is_foreign_key_violation(&e) => return Err(AppError::NotFound),
        Err(e) => return Err(e),
    }

    let updated = sqlx::query("UPDATE ideas SET votes = votes + 1 WHERE id = $1")
        .bind(idea_id)
        .execute(&mut *tx)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    // The increment has been issued; a commit failure here leaves the
    // outcome ambiguous and must not be reported as a plain retryable
    // storage error.
    tx.commit()
        .await
        .map_err(|e| AppError::PartialVote(format!("commit failed for voter {voter_id} on idea {idea_id}: {e}")))?;

    log::info!("voter {voter_id} voted for idea {idea_id}");

    // Republish the updated document. The vote is durable at this point;
    // feed delivery problems are logged, never surfaced as a vote failure.
    match idea::find_by_id(pool, idea_id).await {
        Ok(Some(updated_idea)) => feed_handlers::publish_updated(subscribers, &updated_idea),
        Ok(None) => {}
        Err(e) => log::warn!("tally republish skipped for idea {idea_id}: {e}"),
    }

    Ok(())
}

/// Postgres class 23503: the ledger row referenced an idea that does not
/// exist.
fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23503")
}
