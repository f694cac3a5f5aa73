use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod extract;
mod models;
mod password;
mod repositories;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod testing;

use axum_extra::extract::cookie::Key;
use common::{
    cache::RedisPool,
    database::{self, init_pool},
    document::Collection,
};
use std::sync::Arc;
use tokio::net::TcpListener;

pub use crate::state::AppState;
use crate::{
    config::Settings,
    password::PasswordService,
    repositories::UserRepository,
    session::{RedisSessionStore, SessionManager},
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    info!("Starting authentication service");

    // Initialize database connection pool
    let pool = init_pool(&settings.database).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let users = Collection::new(
        pool,
        &settings.database.collection,
        settings.database.query_timeout(),
    )?;
    users.ensure().await?;

    // Initialize Redis connection
    let redis_pool = RedisPool::new(&settings.redis).await?;

    let cookie_key = Key::try_from(settings.session.secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid session secret: {}", e))?;

    let app_state = AppState {
        users: Arc::new(UserRepository::new(users)),
        sessions: SessionManager::new(
            Arc::new(RedisSessionStore::new(redis_pool)),
            &settings.session,
        ),
        passwords: PasswordService::new()?,
        cookie_key,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind((settings.server.listen_addr.as_str(), settings.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                settings.server.listen_addr, settings.server.port
            )
        })?;
    info!("Authentication service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Authentication service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
