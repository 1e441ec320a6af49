use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use groundwork_core::AppError;
use groundwork_domain::{Mode, RunState};

use crate::bootstrap_ports::{BootstrapRepositories, PasswordHasher, SeedSource};

mod administration;
mod context;
mod execution;
mod guard;
mod policy_compiler;
mod provisioners;
mod state_store;
mod validator;

pub use context::BootstrapContext;
pub use policy_compiler::PolicyCompilationReport;
pub use state_store::StateBackup;
pub use validator::{ValidationIssue, ValidationIssueKind, ValidationReport, validate_catalog};

use provisioners::Provisioners;
use state_store::RunStateStore;

/// Version stamped into every persisted run state.
pub const BOOTSTRAP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Operator switches for the bootstrap service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Ceiling on `execute(allow_reinit = true)`.
    pub allow_reinitialization: bool,
    /// Enables [`BootstrapService::reset_initialization`].
    pub allow_reset: bool,
    /// Mode used when no state has been persisted yet.
    pub initial_mode: Mode,
}

/// Failure of a bootstrap entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// The call was refused before any step ran.
    #[error(transparent)]
    Rejected(#[from] AppError),
    /// A step failed and the run stopped.
    #[error("bootstrap step '{component}' failed: {source}")]
    StepFailed {
        /// Component of the failing step.
        component: String,
        /// Error reported by the step.
        source: AppError,
        /// State after the failure was recorded.
        state: Box<RunState>,
    },
    /// Every step finished but the final state could not be stored.
    #[error("failed to persist bootstrap state: {source}")]
    StatePersistence {
        /// Storage error.
        source: AppError,
        /// State that could not be stored.
        state: Box<RunState>,
    },
}

impl BootstrapError {
    /// Returns the run state captured with the failure, if a run started.
    #[must_use]
    pub fn state(&self) -> Option<&RunState> {
        match self {
            Self::Rejected(_) => None,
            Self::StepFailed { state, .. } | Self::StatePersistence { state, .. } => Some(state),
        }
    }

    /// Returns the underlying application error.
    #[must_use]
    pub fn app_error(&self) -> &AppError {
        match self {
            Self::Rejected(error)
            | Self::StepFailed { source: error, .. }
            | Self::StatePersistence { source: error, .. } => error,
        }
    }
}

impl From<BootstrapError> for AppError {
    fn from(value: BootstrapError) -> Self {
        match value {
            BootstrapError::Rejected(error) => error,
            BootstrapError::StepFailed {
                component, source, ..
            } => AppError::Internal(format!("bootstrap step '{component}' failed: {source}")),
            BootstrapError::StatePersistence { source, .. } => source,
        }
    }
}

/// Orchestrates provisioning runs and owns the persisted run state.
///
/// Every entry point locks the same state slot, so runs, resets and mode
/// changes never interleave.
#[derive(Clone)]
pub struct BootstrapService {
    provisioners: Arc<Provisioners>,
    seeds: Arc<dyn SeedSource>,
    state_store: RunStateStore,
    config: BootstrapConfig,
    state: Arc<Mutex<Option<RunState>>>,
}

impl BootstrapService {
    /// Creates a new bootstrap service.
    #[must_use]
    pub fn new(
        repositories: BootstrapRepositories,
        seeds: Arc<dyn SeedSource>,
        password_hasher: Arc<dyn PasswordHasher>,
        config: BootstrapConfig,
    ) -> Self {
        Self {
            state_store: RunStateStore::new(repositories.options.clone()),
            provisioners: Arc::new(Provisioners::new(&repositories, password_hasher)),
            seeds,
            config,
            state: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the operator switches.
    #[must_use]
    pub fn config(&self) -> BootstrapConfig {
        self.config
    }
}

#[cfg(test)]
mod tests;
