//! Brokerly API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use brokerly_application::ApprovalStore;
use brokerly_core::AppError;
use brokerly_infrastructure::{InMemoryApprovalStore, PostgresApprovalStore};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, StoreBackend, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{build_app_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let store: Arc<dyn ApprovalStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config.database_url.as_deref().ok_or_else(|| {
                AppError::Validation("DATABASE_URL is required for the postgres store".to_owned())
            })?;
            let pool = connect_and_migrate(database_url, config.database_max_connections).await?;

            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            Arc::new(PostgresApprovalStore::new(pool))
        }
        StoreBackend::Memory => {
            if config.migrate_only {
                return Err(AppError::Validation(
                    "migrate requires STORE_BACKEND=postgres".to_owned(),
                ));
            }

            warn!("using the in-memory approval store; data is lost on shutdown");
            Arc::new(InMemoryApprovalStore::new())
        }
    };

    let app_state = build_app_state(store, config.pending_page_size_max);
    let app = build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, store = config.store_backend.as_str(), "brokerly-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
