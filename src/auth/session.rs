use actix_session::Session;

use crate::errors::AppError;

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Resolve the signed-in voter identity, or fail with `Unauthenticated`.
/// Every mutating handler calls this before touching storage.
pub fn require_voter(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or(AppError::Unauthenticated)
}
