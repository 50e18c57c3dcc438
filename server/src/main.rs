//! Client records HTTP server.
//!
//! Reads settings from the environment (and `.env`) and connects to PostgreSQL at
//! `DATABASE_URL`. `CLIENT_STORE=memory` keeps records in process instead.

use client_records::{
    app_router,
    connect_pool,
    ensure_clients_table,
    ensure_database_exists,
    AppState,
    ClientRepository,
    ClientService,
    ConfigError,
    MemoryClientRepository,
    PgClientRepository,
    Settings,
    StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let repository: Arc<dyn ClientRepository> = match (settings.store, &settings.database_url) {
        (StoreKind::Postgres, Some(database_url)) => {
            if settings.auto_create_schema {
                ensure_database_exists(database_url).await?;
            }
            let pool = connect_pool(database_url, settings.db_max_connections).await?;
            if settings.auto_create_schema {
                ensure_clients_table(&pool).await?;
            }
            Arc::new(PgClientRepository::new(pool))
        }
        (StoreKind::Postgres, None) => return Err(ConfigError::Missing { key: "DATABASE_URL" }.into()),
        (StoreKind::Memory, _) => {
            tracing::warn!("CLIENT_STORE=memory; client records are lost on exit");
            Arc::new(MemoryClientRepository::new())
        }
    };

    let state = AppState::new(ClientService::new(repository), settings.max_page_size);
    let app = app_router(state);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("client records service listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
