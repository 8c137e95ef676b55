use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::session::require_voter;
use crate::auth::validate;
use crate::errors::AppError;
use crate::handlers::feed_handlers::{self, SubscriberMap};
use crate::models::idea::{self, Idea, IdeaKind, NewIdea};
use crate::models::team;

/// Generic paginated response wrapper for API endpoints.
#[derive(Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// GET /api/v1/ideas - List ideas, highest tally first.
/// Query params: type (individual|team), region, status (filters),
/// page (default 1), per_page (default 25).
pub async fn list(
    pool: web::Data<PgPool>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let kind_filter = query.get("type").map(|s| s.as_str());
    let region_filter = query.get("region").map(|s| s.as_str());
    let status_filter = query.get("status").map(|s| s.as_str());
    let page = query
        .get("page")
        .and_then(|p| p.parse::<i64>().ok())
        .unwrap_or(1)
        .max(1);
    let per_page = query
        .get("per_page")
        .and_then(|p| p.parse::<i64>().ok())
        .unwrap_or(25)
        .max(1)
        .min(100);

    let all_ideas = idea::find_all(&pool).await?;

    let filtered: Vec<Idea> = all_ideas
        .into_iter()
        .filter(|i| {
            if let Some(kind) = kind_filter {
                if i.kind != kind {
                    return false;
                }
            }
            if let Some(region) = region_filter {
                if i.region.as_deref() != Some(region) {
                    return false;
                }
            }
            if let Some(status) = status_filter {
                if i.status != status {
                    return false;
                }
            }
            true
        })
        .collect();

    let total = filtered.len() as i64;
    let offset = ((page - 1) * per_page) as usize;
    let items: Vec<Idea> = filtered
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    Ok(HttpResponse::Ok().json(PaginatedResponse { items, page, per_page, total }))
}

/// GET /api/v1/ideas/top - Leaderboard read of vote counts.
pub async fn top(
    pool: web::Data<PgPool>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<i64>().ok())
        .unwrap_or(5)
        .max(1)
        .min(50);
    let ideas = idea::find_top(&pool, limit).await?;
    Ok(HttpResponse::Ok().json(ideas))
}

/// GET /api/v1/ideas/{id}
pub async fn read(pool: web::Data<PgPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let found = idea::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

/// GET /api/v1/regions - Per-region idea and vote totals.
pub async fn regions(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let summary = idea::region_summary(&pool).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// POST /api/v1/ideas - Submit a new idea.
///
/// Individual ideas require a region; team ideas may omit it and may name
/// a team. The new document always starts at zero votes, status pending.
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    subscribers: web::Data<SubscriberMap>,
    body: web::Json<NewIdea>,
) -> Result<HttpResponse, AppError> {
    let voter_id = require_voter(&session)?;

    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&body.title, "Title", 200));
    errors.extend(validate::validate_required(&body.description, "Description", 4000));

    let kind = match IdeaKind::parse(&body.kind) {
        Some(k) => Some(k),
        None => {
            errors.push("Type must be 'individual' or 'team'".to_string());
            None
        }
    };
    if let Some(region) = &body.region {
        errors.extend(validate::validate_optional(region, "Region", 100));
    }
    match kind {
        Some(IdeaKind::Individual) => {
            if body.region.as_deref().map(str::trim).unwrap_or("").is_empty() {
                errors.push("Region is required for individual ideas".to_string());
            }
        }
        Some(IdeaKind::Team) => {
            let team_name = body.team_name.as_deref().map(str::trim).unwrap_or("");
            if !team_name.is_empty() {
                errors.extend(validate::validate_optional(team_name, "Team", 100));
                if team::find_by_name(&pool, team_name).await?.is_none() {
                    errors.push(format!("Unknown team '{team_name}'"));
                }
            }
        }
        None => {}
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let created = idea::create(&pool, &body, voter_id).await?;
    feed_handlers::publish_created(&subscribers, &created);

    Ok(HttpResponse::Created().json(created))
}
