//! waitline-server — appointment booking and walk-in queue backend
//!
//! Long-running service that:
//! - Manages the service catalog and bookable time slots
//! - Takes reservations with per-slot capacity enforcement
//! - Runs the walk-in queue: check-in, advance, complete, cancel
//! - Serves a JWT-authenticated customer and admin API

mod api;
mod auth;
mod config;
mod db;
mod error;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waitline_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting waitline-server (env: {})", config.environment);

    // Connect the pool and run migrations
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("waitline-server listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
