use std::sync::Arc;

use groundwork_application::{BootstrapRepositories, BootstrapService};
use groundwork_core::AppError;
use groundwork_infrastructure::{
    Argon2PasswordHasher, BuiltinSeedSource, InMemoryBootstrapStore, PostgresBootstrapStore,
};
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend};
use crate::state::AppState;

use super::connect_and_migrate;

pub async fn build_repositories(
    storage: &StorageBackend,
) -> Result<BootstrapRepositories, AppError> {
    match storage {
        StorageBackend::Memory => {
            info!("using in-memory bootstrap storage");
            Ok(BootstrapRepositories::from_store(Arc::new(
                InMemoryBootstrapStore::new(),
            )))
        }
        StorageBackend::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            info!("using postgres bootstrap storage");
            Ok(BootstrapRepositories::from_store(Arc::new(
                PostgresBootstrapStore::new(pool),
            )))
        }
    }
}

pub fn build_app_state(config: &ApiConfig, repositories: BootstrapRepositories) -> AppState {
    AppState {
        bootstrap_service: BootstrapService::new(
            repositories,
            Arc::new(BuiltinSeedSource::new()),
            Arc::new(Argon2PasswordHasher::new()),
            config.bootstrap,
        ),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
