use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use ideahub::auth::{self, rate_limit::RateLimiter};
use ideahub::db;
use ideahub::handlers::{self, feed_handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&pool).await;

    let seed_hash = auth::password::hash_password("admin123")
        .expect("Failed to hash default password");
    if std::env::var("DEMO_SEED").is_ok() {
        db::seed_demo(&pool, &seed_hash).await;
    } else {
        db::seed_admin(&pool, &seed_hash).await;
    }

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+) — generating random key", val.len());
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let subscribers = feed_handlers::new_subscriber_map();
    let limiter = RateLimiter::new();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(subscribers.clone()))
            .app_data(web::Data::new(limiter.clone()))
            // Live tally feed (WebSocket; no Content-Type guard on upgrades)
            .route("/ws/ideas", web::get().to(feed_handlers::ws_connect))
            .service(
                web::scope("/api/v1")
                    .wrap(actix_web::middleware::from_fn(handlers::require_json_content_type))
                    .configure(handlers::configure_api),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
