use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::require_voter;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::team;

#[derive(Deserialize)]
pub struct NewTeamRequest {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// GET /api/v1/teams
pub async fn list(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let teams = team::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(teams))
}

/// POST /api/v1/teams - Create a team for team ideas to reference.
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<NewTeamRequest>,
) -> Result<HttpResponse, AppError> {
    require_voter(&session)?;

    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&body.name, "Name", 100));
    errors.extend(validate::validate_optional(&body.region, "Region", 100));
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    if team::find_by_name(&pool, body.name.trim()).await?.is_some() {
        return Err(AppError::Validation(format!(
            "A team named '{}' already exists",
            body.name.trim()
        )));
    }

    let created = team::create(&pool, body.name.trim(), body.region.trim(), &body.members).await?;
    Ok(HttpResponse::Created().json(created))
}
