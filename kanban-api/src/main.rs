//! # Kanban API Server
//!
//! HTTP server for the kanban board backend: boards, columns, tasks and
//! subtasks over a transactional document store.
//!
//! ## Usage
//!
//! ```bash
//! # In-memory store (development)
//! cargo run -p kanban-api
//!
//! # PostgreSQL store
//! STORE_BACKEND=postgres DATABASE_URL=postgresql://localhost/kanban cargo run -p kanban-api
//! ```

use kanban_api::app::{build_router, AppState};
use kanban_api::config::{Config, LogFormat, StoreBackend, StoreConfig};
use kanban_shared::db::migrations::{ensure_database_exists, run_migrations};
use kanban_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use kanban_shared::store::{MemoryStore, PgStore, Store};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        "Kanban API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let (store, pg_store) = build_store(&config.store).await?;
    tracing::info!(backend = store.backend(), "Document store ready");

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg_store) = pg_store {
        close_pool(pg_store.pool().clone()).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kanban_api=debug,kanban_shared=debug,tower_http=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

/// Opens the configured store
///
/// The PostgreSQL store is also returned on its own so its pool can be closed
/// on shutdown.
async fn build_store(config: &StoreConfig) -> anyhow::Result<(Arc<dyn Store>, Option<PgStore>)> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok((Arc::new(MemoryStore::new()), None))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres store"))?;

            if config.run_migrations {
                ensure_database_exists(&url).await?;
            }

            let pool = create_pool(DatabaseConfig {
                url,
                max_connections: config.max_connections,
                ..DatabaseConfig::default()
            })
            .await?;

            if config.run_migrations {
                run_migrations(&pool).await?;
            }

            let pg_store = PgStore::new(pool);
            Ok((Arc::new(pg_store.clone()), Some(pg_store)))
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, draining connections..."),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
