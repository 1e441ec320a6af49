use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use groundwork_application::{
    PolicyCompilationReport, StateBackup, ValidationIssue, ValidationIssueKind, ValidationReport,
};
use groundwork_domain::{Mode, RunPhase, RunState, StepStatus};
use serde::{Deserialize, Serialize};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming payload for a full bootstrap run.
#[derive(Debug, Default, Deserialize)]
pub struct ExecuteBootstrapRequest {
    #[serde(default)]
    pub allow_reinit: bool,
}

/// Incoming payload for a mode change.
#[derive(Debug, Deserialize)]
pub struct SetModeRequest {
    pub mode: String,
}

/// API representation of the bootstrap run state.
#[derive(Debug, Serialize)]
pub struct RunStateResponse {
    pub is_initialized: bool,
    pub phase: RunPhase,
    pub mode: Mode,
    pub version: String,
    pub last_run_time: Option<DateTime<Utc>>,
    pub statuses: Vec<StepStatus>,
    pub completed_components: BTreeSet<String>,
}

impl From<RunState> for RunStateResponse {
    fn from(value: RunState) -> Self {
        Self {
            is_initialized: value.is_initialized,
            phase: value.phase,
            mode: value.mode,
            version: value.version,
            last_run_time: value.last_run_time,
            statuses: value.statuses,
            completed_components: value.completed_components,
        }
    }
}

/// API representation of a run-state snapshot.
#[derive(Debug, Serialize)]
pub struct BackupResponse {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub phase: RunPhase,
    pub mode: Mode,
}

impl From<StateBackup> for BackupResponse {
    fn from(value: StateBackup) -> Self {
        Self {
            key: value.key,
            created_at: value.created_at,
            phase: value.phase,
            mode: value.mode,
        }
    }
}

/// API representation of one dangling catalog reference.
#[derive(Debug, Serialize)]
pub struct ValidationIssueResponse {
    pub kind: &'static str,
    pub source: String,
    pub reference: String,
    pub message: String,
}

impl From<ValidationIssue> for ValidationIssueResponse {
    fn from(value: ValidationIssue) -> Self {
        let kind = match value.kind {
            ValidationIssueKind::MenuPermission => "menu_permission",
            ValidationIssueKind::MappedPermission => "mapped_permission",
            ValidationIssueKind::MappedRole => "mapped_role",
            ValidationIssueKind::PolicySubject => "policy_subject",
            ValidationIssueKind::InheritanceRole => "inheritance_role",
        };

        Self {
            kind,
            message: value.to_string(),
            source: value.source,
            reference: value.reference,
        }
    }
}

/// API representation of a catalog validation.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub clean: bool,
    pub issues: Vec<ValidationIssueResponse>,
}

impl From<ValidationReport> for ValidationResponse {
    fn from(value: ValidationReport) -> Self {
        Self {
            clean: value.is_clean(),
            issues: value
                .issues()
                .iter()
                .cloned()
                .map(ValidationIssueResponse::from)
                .collect(),
        }
    }
}

/// API representation of a policy compilation.
#[derive(Debug, Serialize)]
pub struct PolicyCompilationResponse {
    pub dynamic_inserted: usize,
    pub static_inserted: usize,
    pub inheritance_inserted: usize,
    pub binding_inserted: usize,
    pub total_inserted: usize,
    pub malformed_rows: usize,
    pub failed_passes: Vec<&'static str>,
}

impl From<PolicyCompilationReport> for PolicyCompilationResponse {
    fn from(value: PolicyCompilationReport) -> Self {
        Self {
            total_inserted: value.total_inserted(),
            dynamic_inserted: value.dynamic_inserted,
            static_inserted: value.static_inserted,
            inheritance_inserted: value.inheritance_inserted,
            binding_inserted: value.binding_inserted,
            malformed_rows: value.malformed_rows,
            failed_passes: value.failed_passes,
        }
    }
}
