use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application error taxonomy. Every variant maps to a distinct,
/// user-displayable JSON response; technical detail stays in the log.
#[derive(Debug)]
pub enum AppError {
    /// No signed-in identity on the session.
    Unauthenticated,
    /// The voter already holds a ledger entry for this idea. Terminal for
    /// that (voter, idea) pair, not a retryable error.
    DuplicateVote,
    /// Connectivity-class storage failure (pool timeout, broken socket).
    /// The caller must not assume the write was recorded; retry later.
    StorageUnavailable(String),
    /// Transaction commit failed after the vote increment was issued —
    /// outcome ambiguous, needs operator reconciliation.
    PartialVote(String),
    NotFound,
    Validation(String),
    Db(sqlx::Error),
    Hash(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthenticated => write!(f, "Not signed in"),
            AppError::DuplicateVote => write!(f, "Duplicate vote"),
            AppError::StorageUnavailable(e) => write!(f, "Storage unavailable: {e}"),
            AppError::PartialVote(e) => write!(f, "Vote outcome ambiguous: {e}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Validation(e) => write!(f, "Validation failed: {e}"),
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated => HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "You must be signed in to do that." })),
            AppError::DuplicateVote => HttpResponse::Conflict()
                .json(serde_json::json!({ "error": "You have already voted for this idea." })),
            AppError::StorageUnavailable(_) => {
                log::warn!("{self}");
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "Service temporarily unavailable. Please try again."
                }))
            }
            AppError::PartialVote(_) => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Your vote could not be confirmed. Please check the tally before retrying."
                }))
            }
            AppError::NotFound => HttpResponse::NotFound()
                .json(serde_json::json!({ "error": "Not found" })),
            AppError::Validation(msg) => HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": msg })),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "Internal server error" }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => AppError::StorageUnavailable(e.to_string()),
            _ => AppError::Db(e),
        }
    }
}
