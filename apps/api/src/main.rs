//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `auth::AppError`.

use auth::{AuthConfig, PgAuthRepository, auth_router};
use axum::Router;
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interval between expired-binding sweeps
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../database/migrations").run(&pool).await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired device bindings
    // Errors here should not prevent server startup
    let repo = PgAuthRepository::new(pool.clone());
    match repo.cleanup_expired().await {
        Ok(bindings) => {
            tracing::info!(bindings_deleted = bindings, "Device binding cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Device binding cleanup failed, continuing anyway");
        }
    }

    // Periodic sweep so lapsed bindings free their quota slots even
    // without a restart
    let sweep_repo = PgAuthRepository::new(pool.clone());
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            match sweep_repo.cleanup_expired().await {
                Ok(bindings) if bindings > 0 => {
                    tracing::info!(bindings_deleted = bindings, "Device binding sweep completed");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Device binding sweep failed");
                }
            }
        }
    });

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set in production");
        let token_secret = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        anyhow::ensure!(
            token_secret.len() >= 32,
            "TOKEN_SECRET must decode to at least 32 bytes"
        );
        let token_ttl = match env::var("TOKEN_TTL_SECS") {
            Ok(secs) => Duration::from_secs(secs.parse()?),
            Err(_) => AuthConfig::default().token_ttl,
        };
        AuthConfig {
            token_secret,
            token_ttl,
            ..AuthConfig::default()
        }
    };

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(repo, auth_config))
        .layer(TraceLayer::new_for_http());

    // Start server
    let port: u16 = match env::var("APP_PORT") {
        Ok(port) => port.parse()?,
        Err(_) => 31113,
    };
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
