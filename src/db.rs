use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::models::{idea, team, user};

/// Embedded migrations; tests apply the same set to their databases.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) {
    MIGRATOR.run(pool).await.expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the admin account if the database has no users yet.
pub async fn seed_admin(pool: &PgPool, admin_password_hash: &str) {
    let count = user::count(pool).await.expect("Failed to count users for seeding");
    if count > 0 {
        log::info!("Database already seeded ({count} users), skipping admin seed");
        return;
    }

    user::create(
        pool,
        &user::NewUser {
            username: "admin".to_string(),
            password: admin_password_hash.to_string(),
            display_name: "Administrator".to_string(),
            email: "admin@example.com".to_string(),
        },
    )
    .await
    .expect("Failed to seed admin user");
    log::info!("Admin seed complete");
}

/// Seed admin plus demo voters, teams, and ideas (behind DEMO_SEED).
pub async fn seed_demo(pool: &PgPool, password_hash: &str) {
    seed_admin(pool, password_hash).await;

    // Skip if demo data already present
    if user::find_by_username(pool, "alice")
        .await
        .expect("Failed to check for demo data")
        .is_some()
    {
        log::info!("Demo data already present, skipping");
        return;
    }

    let mut voter_ids = Vec::new();
    for (username, display_name) in [
        ("alice", "Alice Moreau"),
        ("bob", "Bob Tanaka"),
        ("charlie", "Charlie Osei"),
        ("diana", "Diana Lindqvist"),
    ] {
        let id = user::create(
            pool,
            &user::NewUser {
                username: username.to_string(),
                password: password_hash.to_string(),
                display_name: display_name.to_string(),
                email: format!("{username}@example.com"),
            },
        )
        .await
        .expect("Failed to seed demo user");
        voter_ids.push(id);
    }

    team::create(
        pool,
        "Green Commute",
        "Berlin, Germany",
        &["alice".to_string(), "bob".to_string()],
    )
    .await
    .expect("Failed to seed demo team");
    team::create(
        pool,
        "Night Shift",
        "Tokyo, Japan",
        &["charlie".to_string(), "diana".to_string()],
    )
    .await
    .expect("Failed to seed demo team");

    let demo_ideas = [
        (
            "Rooftop garden program",
            "Convert unused office rooftops into shared gardens.",
            "individual",
            Some("Berlin, Germany"),
            None,
        ),
        (
            "Late-hours shuttle pooling",
            "Pool shuttle rides for teams working past midnight.",
            "team",
            Some("Tokyo, Japan"),
            Some("Night Shift"),
        ),
        (
            "Bike-to-work credits",
            "Reward commuting by bike with cafeteria credits.",
            "team",
            None,
            Some("Green Commute"),
        ),
    ];
    for (title, description, kind, region, team_name) in demo_ideas {
        idea::create(
            pool,
            &idea::NewIdea {
                title: title.to_string(),
                description: description.to_string(),
                kind: kind.to_string(),
                region: region.map(str::to_string),
                team_name: team_name.map(str::to_string),
            },
            voter_ids[0],
        )
        .await
        .expect("Failed to seed demo idea");
    }

    log::info!("Demo seed complete");
}
