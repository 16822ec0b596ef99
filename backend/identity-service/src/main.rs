//! Identity Service - main entry point
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use identity_service::{config::Config, routes, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env().context("failed to load configuration from environment")?;

    tracing::info!(
        "starting identity-service on {}:{}",
        config.server_host,
        config.server_port
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("database connection pool initialized");

    let state = AppState::build(config, db_pool);

    spawn_session_sweeper(&state);

    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.server_host, state.config.server_port
    )
    .parse()
    .context("invalid server address")?;

    let app = routes::build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await.context("server failed")?;

    Ok(())
}

/// Periodic expiry sweep; expired rows are never cleaned up implicitly on
/// read, so this job is the only thing bounding table growth.
fn spawn_session_sweeper(state: &AppState) {
    let sessions = state.sessions.clone();
    let interval = Duration::from_secs(state.config.session_sweep_interval_secs);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so startup is quiet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match sessions.sweep_expired().await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "swept expired refresh sessions"),
                Err(e) => tracing::warn!(error = %e, "session sweep failed"),
            }
        }
    });
}
