use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use ipl_teams_api::api;
use ipl_teams_api::config::{AppConfig, StoreBackend};
use ipl_teams_api::domain::repositories::KeyValueStore;
use ipl_teams_api::domain::team::TeamRegistry;
use ipl_teams_api::infrastructure::stores::{InMemoryStore, RedisStore, RedisStoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    let store = build_store(&config).await?;
    let registry = Arc::new(TeamRegistry::new(store));

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(registry)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match config.store_backend {
        StoreBackend::Redis => {
            tracing::info!("Connecting to Redis...");
            let mut redis_config = RedisStoreConfig::new(config.redis_url.clone());
            if let Some(prefix) = &config.redis_key_prefix {
                redis_config = redis_config.with_key_prefix(prefix.clone());
            }

            let store = RedisStore::connect(redis_config)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Redis connected successfully");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
