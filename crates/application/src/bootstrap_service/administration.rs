use chrono::Utc;
use tracing::{info, warn};

use groundwork_core::{AppError, AppResult};
use groundwork_domain::{Mode, RunPhase, RunState};

use super::{
    BOOTSTRAP_VERSION, BootstrapService, StateBackup, ValidationReport, validate_catalog,
};

impl BootstrapService {
    /// Returns a copy of the current run state.
    pub async fn state(&self) -> AppResult<RunState> {
        let mut slot = self.state.lock().await;
        Ok(self.loaded_state(&mut slot).await?.clone())
    }

    /// Changes the mode used by the next run. Only allowed before anything
    /// has been provisioned.
    pub async fn set_mode(&self, mode: Mode) -> AppResult<RunState> {
        let mut slot = self.state.lock().await;
        let state = self.loaded_state(&mut slot).await?;
        if state.phase != RunPhase::NotInitialized {
            return Err(AppError::Conflict(format!(
                "mode cannot change from '{}' once bootstrap has run",
                state.mode.as_str()
            )));
        }

        let previous = state.mode;
        state.mode = mode;
        if let Err(error) = self.state_store.save(state).await {
            state.mode = previous;
            return Err(error);
        }

        info!(mode = mode.as_str(), "bootstrap mode changed");
        Ok(state.clone())
    }

    /// Clears completion flags so the next run starts over. Provisioned rows
    /// are kept.
    pub async fn reset_initialization(&self) -> AppResult<RunState> {
        if !self.config.allow_reset {
            return Err(AppError::Forbidden(
                "bootstrap reset is disabled".to_owned(),
            ));
        }

        let mut slot = self.state.lock().await;
        let state = self.loaded_state(&mut slot).await?;
        if state.phase == RunPhase::NotInitialized {
            return Err(AppError::NotInitialized(
                "bootstrap has not run yet".to_owned(),
            ));
        }

        if let Err(error) = self.state_store.create_backup(state, Utc::now()).await {
            warn!(%error, "failed to snapshot bootstrap state before reset");
        }

        let mut reset = state.clone();
        reset.reset();
        self.state_store.save(&reset).await?;
        *state = reset;

        info!("bootstrap state reset");
        Ok(state.clone())
    }

    /// Stores a snapshot of the current run state.
    pub async fn create_backup(&self) -> AppResult<StateBackup> {
        let mut slot = self.state.lock().await;
        let state = self.loaded_state(&mut slot).await?;
        if state.phase == RunPhase::NotInitialized {
            return Err(AppError::NotInitialized(
                "bootstrap has not run yet".to_owned(),
            ));
        }

        self.state_store.create_backup(state, Utc::now()).await
    }

    /// Lists stored snapshots, newest first.
    pub async fn list_backups(&self) -> AppResult<Vec<StateBackup>> {
        self.state_store.list_backups().await
    }

    /// Replaces the current run state with a stored snapshot.
    pub async fn restore_backup(&self, key: &str) -> AppResult<RunState> {
        let mut slot = self.state.lock().await;
        let state = self.loaded_state(&mut slot).await?;

        let mut restored = self.state_store.load_backup(key).await?;
        restored.recover_interrupted();
        self.state_store.save(&restored).await?;
        *state = restored;

        info!(key, phase = state.phase.as_str(), "bootstrap state restored");
        Ok(state.clone())
    }

    /// Checks the current mode's catalog for dangling references.
    pub async fn validate(&self) -> AppResult<ValidationReport> {
        let mode = self.state().await?.mode;
        let loader = self.seeds.loader(mode);

        Ok(validate_catalog(loader.as_ref()))
    }

    /// Loads the persisted state on first use. A state left running by a
    /// crashed process is turned into a failure and stored again.
    pub(super) async fn loaded_state<'a>(
        &self,
        slot: &'a mut Option<RunState>,
    ) -> AppResult<&'a mut RunState> {
        if slot.is_none() {
            let mut state = self
                .state_store
                .load()
                .await?
                .unwrap_or_else(|| RunState::new(self.config.initial_mode, BOOTSTRAP_VERSION));
            if state.recover_interrupted() {
                warn!("previous bootstrap run was interrupted, marking it as failed");
                self.state_store.save(&state).await?;
            }
            *slot = Some(state);
        }

        slot.as_mut().ok_or_else(|| {
            AppError::Internal("bootstrap state slot is empty after loading".to_owned())
        })
    }
}
