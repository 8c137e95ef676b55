use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::require_voter;
use crate::errors::AppError;
use crate::handlers::feed_handlers::SubscriberMap;
use crate::votes::{coordinator, ledger};

/// POST /api/v1/ideas/{id}/vote - Cast the session voter's vote.
///
/// 204 on success; the new tally arrives on the feed, not in the response.
/// 409 when this voter already voted for the idea.
pub async fn cast(
    pool: web::Data<PgPool>,
    session: Session,
    subscribers: web::Data<SubscriberMap>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let voter_id = require_voter(&session)?;
    let idea_id = path.into_inner();

    coordinator::cast_vote(&pool, &subscribers, voter_id, idea_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/votes/mine - The voter's recorded idea ids, for disabling
/// already-used vote controls.
pub async fn mine(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let voter_id = require_voter(&session)?;

    let mut idea_ids: Vec<i64> = ledger::get(&pool, voter_id).await?.into_iter().collect();
    idea_ids.sort_unstable();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "idea_ids": idea_ids })))
}
