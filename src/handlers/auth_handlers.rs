use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::auth::session::get_user_id;
use crate::auth::password;
use crate::errors::AppError;
use crate::models::user;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn user_json(u: &user::User) -> serde_json::Value {
    serde_json::json!({
        "id": u.id,
        "username": u.username,
        "display_name": u.display_name,
        "email": u.email,
    })
}

/// POST /api/v1/auth/login
pub async fn login(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    limiter: web::Data<RateLimiter>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        return Ok(HttpResponse::TooManyRequests().json(serde_json::json!({
            "error": "Too many failed login attempts. Please try again later."
        })));
    }

    let found = user::find_by_username(&pool, &body.username).await?;

    if let Some(u) = found {
        if password::verify_password(&body.password, &u.password)? {
            limiter.clear(ip);
            let _ = session.insert("user_id", u.id);
            let _ = session.insert("username", &u.username);
            return Ok(HttpResponse::Ok().json(user_json(&u)));
        }
    }

    limiter.record_failure(ip);
    Ok(HttpResponse::Unauthorized().json(serde_json::json!({
        "error": "Invalid username or password"
    })))
}

/// POST /api/v1/auth/logout
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/auth/me - the current identity, or 401.
pub async fn me(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let user_id = get_user_id(&session).ok_or(AppError::Unauthenticated)?;
    let u = user::find_by_id(&pool, user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;
    Ok(HttpResponse::Ok().json(user_json(&u)))
}
