pub mod auth_handlers;
pub mod feed_handlers;
pub mod idea_handlers;
pub mod team_handlers;
pub mod vote_handlers;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

/// CSRF protection for REST API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't have Content-Type:
/// application/json. Browsers cannot send cross-origin JSON with cookies
/// via simple form POST — the Content-Type check acts as a CSRF guard
/// without requiring tokens. GET requests are exempt.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// API v1 route table. Mounted under `/api/v1` by the server and by the
/// HTTP tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/login", web::post().to(auth_handlers::login))
        .route("/auth/logout", web::post().to(auth_handlers::logout))
        .route("/auth/me", web::get().to(auth_handlers::me))
        // /ideas/top BEFORE /ideas/{id} to avoid routing conflict
        .route("/ideas/top", web::get().to(idea_handlers::top))
        .route("/ideas", web::get().to(idea_handlers::list))
        .route("/ideas", web::post().to(idea_handlers::create))
        .route("/ideas/{id}", web::get().to(idea_handlers::read))
        .route("/ideas/{id}/vote", web::post().to(vote_handlers::cast))
        .route("/votes/mine", web::get().to(vote_handlers::mine))
        .route("/regions", web::get().to(idea_handlers::regions))
        .route("/teams", web::get().to(team_handlers::list))
        .route("/teams", web::post().to(team_handlers::create));
}
