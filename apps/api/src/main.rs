//! Groundwork API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use groundwork_core::AppError;
use tracing::info;

use crate::api_config::{ApiCommand, ApiConfig, StorageBackend};
use crate::api_services::{build_app_state, build_repositories, connect_and_migrate};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    if config.command == ApiCommand::Migrate {
        if let StorageBackend::Postgres { database_url } = &config.storage {
            connect_and_migrate(database_url).await?;
        }
        info!("database migrations applied successfully");
        return Ok(());
    }

    let repositories = build_repositories(&config.storage).await?;
    let app_state = build_app_state(&config, repositories);

    if config.command == ApiCommand::Bootstrap {
        let run_state = app_state
            .bootstrap_service
            .execute(config.bootstrap.allow_reinitialization)
            .await?;
        info!(
            mode = run_state.mode.as_str(),
            phase = run_state.phase.as_str(),
            steps = run_state.statuses.len(),
            "bootstrap command finished"
        );
        return Ok(());
    }

    if config.bootstrap_on_start {
        bootstrap_on_start(&app_state).await?;
    }

    let address = config.socket_address()?;
    let app = api_router::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "groundwork-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

async fn bootstrap_on_start(app_state: &AppState) -> Result<(), AppError> {
    match app_state.bootstrap_service.execute(false).await {
        Ok(run_state) => {
            info!(phase = run_state.phase.as_str(), "startup bootstrap finished");
            Ok(())
        }
        Err(error) => match AppError::from(error) {
            AppError::AlreadyInitialized(_) => {
                info!("bootstrap already completed, skipping startup run");
                Ok(())
            }
            other => Err(other),
        },
    }
}
