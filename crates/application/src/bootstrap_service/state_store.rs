use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use groundwork_core::{AppError, AppResult};
use groundwork_domain::{Mode, RunPhase, RunState};

use crate::bootstrap_ports::OptionRepository;

const STATE_KEY: &str = "bootstrap.state";
const BACKUP_KEY_PREFIX: &str = "bootstrap.backup.";

/// Summary of a stored run-state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateBackup {
    /// Option key holding the snapshot.
    pub key: String,
    /// Snapshot time.
    pub created_at: DateTime<Utc>,
    /// Phase captured by the snapshot.
    pub phase: RunPhase,
    /// Mode captured by the snapshot.
    pub mode: Mode,
}

/// Persists the run state and its snapshots as global options.
#[derive(Clone)]
pub(crate) struct RunStateStore {
    options: Arc<dyn OptionRepository>,
}

impl RunStateStore {
    pub(crate) fn new(options: Arc<dyn OptionRepository>) -> Self {
        Self { options }
    }

    pub(crate) async fn load(&self) -> AppResult<Option<RunState>> {
        self.options
            .find_option(None, STATE_KEY)
            .await?
            .map(|option| decode_state(&option.value))
            .transpose()
    }

    pub(crate) async fn save(&self, state: &RunState) -> AppResult<()> {
        self.options
            .upsert_option(None, STATE_KEY, &encode_state(state)?)
            .await?;
        Ok(())
    }

    pub(crate) async fn create_backup(
        &self,
        state: &RunState,
        created_at: DateTime<Utc>,
    ) -> AppResult<StateBackup> {
        let key = format!("{BACKUP_KEY_PREFIX}{}", created_at.timestamp_millis());
        self.options
            .upsert_option(None, &key, &encode_state(state)?)
            .await?;

        Ok(StateBackup {
            key,
            created_at,
            phase: state.phase,
            mode: state.mode,
        })
    }

    /// Lists snapshots, newest first.
    pub(crate) async fn list_backups(&self) -> AppResult<Vec<StateBackup>> {
        let mut backups = Vec::new();
        for option in self.options.list_options(None, BACKUP_KEY_PREFIX).await? {
            let Some(created_at) = backup_time(&option.key) else {
                continue;
            };
            let state = decode_state(&option.value)?;
            backups.push(StateBackup {
                key: option.key,
                created_at,
                phase: state.phase,
                mode: state.mode,
            });
        }

        backups.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(backups)
    }

    pub(crate) async fn load_backup(&self, key: &str) -> AppResult<RunState> {
        if backup_time(key).is_none() {
            return Err(AppError::Validation(format!(
                "'{key}' is not a bootstrap backup key"
            )));
        }

        let option = self
            .options
            .find_option(None, key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("bootstrap backup '{key}' does not exist")))?;
        decode_state(&option.value)
    }
}

fn backup_time(key: &str) -> Option<DateTime<Utc>> {
    let millis = key.strip_prefix(BACKUP_KEY_PREFIX)?.parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

fn encode_state(state: &RunState) -> AppResult<String> {
    serde_json::to_string(state)
        .map_err(|error| AppError::Internal(format!("failed to encode bootstrap state: {error}")))
}

fn decode_state(value: &str) -> AppResult<RunState> {
    serde_json::from_str(value)
        .map_err(|error| AppError::Internal(format!("failed to decode bootstrap state: {error}")))
}
