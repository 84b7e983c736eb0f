//! Cinebook server binary.
//!
//! # Usage
//!
//! ```bash
//! export JWT_SECRET=change-me
//! export MOVIE_BEARER_TOKEN=...
//! cargo run --bin cinebook-server
//! ```

use anyhow::Context;
use cinebook_auth::{AuthService, TokenService};
use cinebook_catalog::TmdbClient;
use cinebook_core::{Clock, ReservationService, SystemClock};
use cinebook_postgres::{PostgresReservationStore, PostgresUserRepository};
use cinebook_server::{AppState, Config, build_router};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cinebook=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Cinebook server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(config = ?config, "Configuration loaded");

    let pool = cinebook_postgres::connect(&config.database.url, &config.pool_settings())
        .await
        .context("Failed to connect to PostgreSQL")?;
    cinebook_postgres::migrate(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("✓ Database ready");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let reservations = ReservationService::new(
        Arc::new(PostgresReservationStore::new(pool)),
        users.clone(),
        clock.clone(),
    )
    .with_policy(config.admission_policy());

    let auth_config = config.auth_config();
    let tokens = TokenService::new(&auth_config, clock);
    let auth = AuthService::new(users, tokens, &auth_config);

    let bearer_token = config.catalog.bearer_token.clone().unwrap_or_else(|| {
        tracing::warn!("MOVIE_BEARER_TOKEN not set, catalog requests will be rejected upstream");
        String::new()
    });
    let catalog = Arc::new(TmdbClient::with_base_url(bearer_token, &config.catalog.base_url));

    let state = AppState::new(reservations, auth, catalog);
    let app = build_router(state, &config.server.cors_allowed_origins);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(address = %address, "🎬 Cinebook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
