//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::middleware::Next;
use axum::routing::get;
use axum::{Json, Router, http};
use chrono::Utc;
use gatekeeper::{GatekeeperConfig, GatekeeperState, InMemoryRateLimitStore};
use platform::rate_limit::{RateLimitConfig, RateLimitStore};
use reports::{
    GenerationWorker, PgReportRepository, ReportConfig, ReportLifecycle, StaticRenderer,
    reports_router,
};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// GET /health
async fn health(started: Instant) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "uptimeSecs": started.elapsed().as_secs(),
    }))
}

/// GET /metrics
///
/// Minimal status payload; there is no metrics pipeline, observability is
/// structured logging.
async fn metrics(started: Instant) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "uptimeSecs": started.elapsed().as_secs(),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,gatekeeper=info,reports=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let started = Instant::now();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired reports
    // Errors here should not prevent server startup
    let repo_for_cleanup = PgReportRepository::new(pool.clone());
    match repo_for_cleanup.cleanup_expired().await {
        Ok(deleted) => {
            tracing::info!(reports_deleted = deleted, "Expired report cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Expired report cleanup failed, continuing anyway");
        }
    }

    // Gatekeeper configuration
    let gate_config = GatekeeperConfig {
        rate_limit: RateLimitConfig::new(
            env_parse("RATE_LIMIT_MAX_REQUESTS", 100),
            env_parse("RATE_LIMIT_WINDOW_SECS", 60),
        ),
        ..GatekeeperConfig::default()
    };
    let gate_state = GatekeeperState::new(InMemoryRateLimitStore::new(), gate_config);

    // Periodic sweep of idle rate limit entries
    let sweep_store = gate_state.store.clone();
    let sweep_config = gate_state.config.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_config.sweep_interval());
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = sweep_store.sweep(&sweep_config.rate_limit, Utc::now()).await {
                tracing::warn!(error = %e, "rate limit sweep failed");
            }
        }
    });

    // Report lifecycle and generation worker
    let report_config = ReportConfig {
        retention_days: env_parse("REPORT_RETENTION_DAYS", 30),
        ..ReportConfig::default()
    };
    let report_repo = Arc::new(PgReportRepository::new(pool.clone()));
    let (lifecycle, jobs) = ReportLifecycle::new(report_repo, report_config);

    let worker = GenerationWorker::new(lifecycle.clone(), StaticRenderer::default(), jobs);
    tokio::spawn(worker.run());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router; the rate limiter wraps the handlers and the security
    // filter wraps the rate limiter
    let rate_state = gate_state.clone();
    let security_state = gate_state;

    let app = Router::new()
        .route("/health", get(move || health(started)))
        .route("/metrics", get(move || metrics(started)))
        .nest("/api/reports", reports_router(lifecycle))
        .layer(axum::middleware::from_fn(
            move |req: Request<Body>, next: Next| {
                let state = rate_state.clone();
                async move { gatekeeper::rate_limit(state, req, next).await }
            },
        ))
        .layer(axum::middleware::from_fn(
            move |req: Request<Body>, next: Next| {
                let state = security_state.clone();
                async move { gatekeeper::security_filter(state, req, next).await }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env_parse("PORT", 8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
