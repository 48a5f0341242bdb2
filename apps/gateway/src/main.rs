//! # Mentora Gateway
//!
//! Rate-limited AI request gateway: three feature surfaces (study plans,
//! resource curation, document Q&A) behind a two-layer rate-limiting
//! ingress chain, backed by MongoDB and an external AI provider.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;

use config::AppConfig;
use mentora_core::ports::RateLimiter;
use mentora_infra::rate_limit::FixedWindowLimiter;
use middleware::error::json_config;
use middleware::rate_limit::RateLimitMiddleware;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration; missing required variables are fatal before the
    // listening port is ever bound.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // Provision the uploads directory. Idempotent: a second startup with the
    // directory already present is a no-op.
    if let Err(e) = tokio::fs::create_dir_all(&config.uploads_dir).await {
        tracing::error!(
            path = %config.uploads_dir.display(),
            error = %e,
            "Failed to create uploads directory"
        );
        std::process::exit(1);
    }
    tracing::info!(path = %config.uploads_dir.display(), "Uploads directory ready");

    // Connect to MongoDB and build state. Initial connection failure is
    // fatal; there is no partial-service mode.
    let state = match AppState::init(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    };

    // One limiter instance per scope; independent counters and key spaces.
    let global_limiter: Arc<dyn RateLimiter> =
        Arc::new(FixedWindowLimiter::new(config.global_rate_limit.clone()));
    let ai_limiter: Arc<dyn RateLimiter> =
        Arc::new(FixedWindowLimiter::new(config.ai_rate_limit.clone()));

    tracing::info!(
        "Starting mentora gateway on {}:{}",
        config.host,
        config.port
    );

    // Middleware run outermost-first: CORS, request tracing, global rate
    // limit; the AI-scoped limiter is mounted per scope inside the routes.
    HttpServer::new(move || {
        App::new()
            .wrap(RateLimitMiddleware::global(global_limiter.clone()))
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config())
            .configure(|cfg| handlers::configure_routes(cfg, ai_limiter.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mentora_gateway=debug,mentora_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
