use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blog_service::config::Config;
use blog_service::handlers::{self, AppState};
use blog_service::repository::PostgresBlogStore;

struct HealthState {
    pool: PgPool,
}

async fn health(state: web::Data<HealthState>) -> HttpResponse {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "service": "blog-service",
        })),
        Err(err) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "service": "blog-service",
            "error": err.to_string(),
        })),
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    if allowed_origins.trim() == "*" {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
    }
    cors
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_millis(config.database.acquire_timeout_ms))
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = Arc::new(PostgresBlogStore::new(pool.clone()));
    let state = web::Data::new(AppState::new(
        store,
        config.feed.page_size,
        Duration::from_secs(config.feed.cache_ttl_secs),
    ));
    let health_state = web::Data::new(HealthState { pool });

    let bind_addr = (config.app.host.clone(), config.app.port);
    info!(host = %config.app.host, port = config.app.port, "starting blog-service");

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(build_cors(&allowed_origins))
            .app_data(state.clone())
            .app_data(health_state.clone())
            .route("/api/v1/health", web::get().to(health))
            .service(web::scope("/api/v1").configure(handlers::configure))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
