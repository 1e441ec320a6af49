//! Persisted record of bootstrap progress.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Mode;

/// One provisioning step of the bootstrap pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStep {
    /// Role templates.
    Roles,
    /// Permission templates and role-permission assignments.
    Permissions,
    /// Tenants and spaces.
    Tenants,
    /// Users, role bindings and employees.
    Users,
    /// Compiled authorization tuples.
    Policies,
    /// Navigation menus.
    Menus,
    /// Tenant options.
    Options,
    /// Dictionaries and their entries.
    Dictionaries,
    /// Organizational units.
    Organizations,
}

impl BootstrapStep {
    /// Full pipeline in dependency order.
    pub const PIPELINE: [Self; 9] = [
        Self::Roles,
        Self::Permissions,
        Self::Tenants,
        Self::Users,
        Self::Policies,
        Self::Menus,
        Self::Options,
        Self::Dictionaries,
        Self::Organizations,
    ];

    /// Returns the component name recorded in step statuses.
    #[must_use]
    pub fn component(&self) -> &'static str {
        match self {
            Self::Roles => "roles",
            Self::Permissions => "permissions",
            Self::Tenants => "tenants",
            Self::Users => "users",
            Self::Policies => "policies",
            Self::Menus => "menus",
            Self::Options => "options",
            Self::Dictionaries => "dictionaries",
            Self::Organizations => "organizations",
        }
    }

    /// Returns the steps whose output this step reads.
    #[must_use]
    pub fn dependencies(&self) -> &'static [Self] {
        match self {
            Self::Roles | Self::Tenants | Self::Dictionaries => &[],
            Self::Permissions => &[Self::Roles],
            Self::Users => &[Self::Roles, Self::Permissions, Self::Tenants],
            Self::Policies => &[Self::Roles, Self::Permissions, Self::Tenants],
            Self::Menus => &[Self::Permissions],
            Self::Options => &[Self::Tenants],
            Self::Organizations => &[Self::Tenants, Self::Users],
        }
    }

    /// Returns this step preceded by its transitive dependencies, in pipeline
    /// order.
    #[must_use]
    pub fn closure(&self) -> Vec<Self> {
        let mut required = BTreeSet::from([*self]);
        let mut pending = vec![*self];
        while let Some(step) = pending.pop() {
            for dependency in step.dependencies() {
                if required.insert(*dependency) {
                    pending.push(*dependency);
                }
            }
        }

        Self::PIPELINE
            .into_iter()
            .filter(|step| required.contains(step))
            .collect()
    }
}

/// Outcome of one step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The step finished.
    Initialized,
    /// The step returned an error.
    Failed,
}

/// Status appended once per step invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStatus {
    /// Component name.
    pub component: String,
    /// Outcome.
    pub status: StepOutcome,
    /// Error message when the step failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepStatus {
    /// Creates a successful status.
    #[must_use]
    pub fn initialized(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: StepOutcome::Initialized,
            error: None,
        }
    }

    /// Creates a failed status.
    #[must_use]
    pub fn failed(component: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: StepOutcome::Failed,
            error: Some(error.into()),
        }
    }
}

/// Lifecycle phase of the bootstrap state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Nothing has run since creation or the last reset.
    #[default]
    NotInitialized,
    /// A run is in progress.
    Running,
    /// A slice entry point finished, but some mandatory steps have never run.
    Partial,
    /// Every mandatory step has completed.
    Initialized,
    /// The last run stopped at a failing step.
    Failed,
}

impl RunPhase {
    /// Returns a stable storage value for this phase.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::Running => "running",
            Self::Partial => "partial",
            Self::Initialized => "initialized",
            Self::Failed => "failed",
        }
    }
}

/// Component name used for statuses the orchestrator records itself.
pub const ORCHESTRATOR_COMPONENT: &str = "orchestrator";

/// Persisted bootstrap progress.
///
/// `statuses` holds the most recent run only. `completed_components`
/// accumulates across runs and drives `is_initialized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Whether every mandatory step has completed at least once.
    pub is_initialized: bool,
    /// Lifecycle phase.
    #[serde(default)]
    pub phase: RunPhase,
    /// Ordered statuses of the most recent run.
    #[serde(default)]
    pub statuses: Vec<StepStatus>,
    /// Components that reported `initialized` in any run since the last reset.
    #[serde(default)]
    pub completed_components: BTreeSet<String>,
    /// End of the last successful run.
    #[serde(default)]
    pub last_run_time: Option<DateTime<Utc>>,
    /// Version of the service that wrote the state.
    pub version: String,
    /// Mode the state was provisioned with.
    pub mode: Mode,
}

impl RunState {
    /// Creates a pristine state.
    #[must_use]
    pub fn new(mode: Mode, version: impl Into<String>) -> Self {
        Self {
            is_initialized: false,
            phase: RunPhase::NotInitialized,
            statuses: Vec::new(),
            completed_components: BTreeSet::new(),
            last_run_time: None,
            version: version.into(),
            mode,
        }
    }

    /// Starts a run: clears the previous run's statuses and pins the mode.
    pub fn begin_run(&mut self, mode: Mode, version: &str) {
        self.phase = RunPhase::Running;
        self.statuses.clear();
        self.mode = mode;
        version.clone_into(&mut self.version);
    }

    /// Appends a successful step.
    pub fn record_success(&mut self, step: BootstrapStep) {
        self.statuses.push(StepStatus::initialized(step.component()));
        self.completed_components
            .insert(step.component().to_owned());
        self.refresh_initialized();
    }

    /// Appends a failed step and moves to [`RunPhase::Failed`].
    pub fn record_failure(&mut self, component: &str, error: impl Into<String>) {
        self.statuses.push(StepStatus::failed(component, error));
        self.phase = RunPhase::Failed;
    }

    /// Closes a run in which every invoked step succeeded.
    pub fn finish_run(&mut self, finished_at: DateTime<Utc>) {
        self.refresh_initialized();
        self.phase = if self.is_initialized {
            RunPhase::Initialized
        } else {
            RunPhase::Partial
        };
        self.last_run_time = Some(finished_at);
    }

    /// Clears completion flags and history. Provisioned rows are untouched.
    pub fn reset(&mut self) {
        self.is_initialized = false;
        self.phase = RunPhase::NotInitialized;
        self.statuses.clear();
        self.completed_components.clear();
    }

    /// Converts a state left in [`RunPhase::Running`] by a crashed process
    /// into a failed one. Returns whether anything changed.
    pub fn recover_interrupted(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }

        self.record_failure(
            ORCHESTRATOR_COMPONENT,
            "run was interrupted before completion",
        );
        true
    }

    /// Returns whether every mandatory component has completed.
    #[must_use]
    pub fn all_steps_completed(&self) -> bool {
        BootstrapStep::PIPELINE
            .iter()
            .all(|step| self.completed_components.contains(step.component()))
    }

    /// Returns the first failed status of the last run.
    #[must_use]
    pub fn first_failure(&self) -> Option<&StepStatus> {
        self.statuses
            .iter()
            .find(|status| status.status == StepOutcome::Failed)
    }

    fn refresh_initialized(&mut self) {
        self.is_initialized = self.all_steps_completed();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{BootstrapStep, RunPhase, RunState, StepOutcome};
    use crate::Mode;

    #[test]
    fn users_closure_provisions_roles_permissions_and_tenants_first() {
        assert_eq!(
            BootstrapStep::Users.closure(),
            vec![
                BootstrapStep::Roles,
                BootstrapStep::Permissions,
                BootstrapStep::Tenants,
                BootstrapStep::Users,
            ]
        );
    }

    #[test]
    fn pipeline_respects_every_dependency() {
        for (index, step) in BootstrapStep::PIPELINE.iter().enumerate() {
            for dependency in step.dependencies() {
                let position = BootstrapStep::PIPELINE
                    .iter()
                    .position(|candidate| candidate == dependency);
                assert!(position.is_some_and(|position| position < index));
            }
        }
    }

    #[test]
    fn partial_run_does_not_mark_initialized() {
        let mut state = RunState::new(Mode::Company, "test");
        state.begin_run(Mode::Company, "test");
        for step in BootstrapStep::Users.closure() {
            state.record_success(step);
        }
        state.finish_run(Utc::now());

        assert!(!state.is_initialized);
        assert_eq!(state.phase, RunPhase::Partial);
    }

    #[test]
    fn completion_accumulates_across_runs() {
        let mut state = RunState::new(Mode::Website, "test");
        state.begin_run(Mode::Website, "test");
        for step in &BootstrapStep::PIPELINE[..4] {
            state.record_success(*step);
        }
        state.finish_run(Utc::now());

        state.begin_run(Mode::Website, "test");
        for step in &BootstrapStep::PIPELINE[4..] {
            state.record_success(*step);
        }
        state.finish_run(Utc::now());

        assert!(state.is_initialized);
        assert_eq!(state.phase, RunPhase::Initialized);
        assert_eq!(state.statuses.len(), 5);
    }

    #[test]
    fn interrupted_run_is_recovered_as_failure() {
        let mut state = RunState::new(Mode::Website, "test");
        state.begin_run(Mode::Website, "test");

        assert!(state.recover_interrupted());
        assert_eq!(state.phase, RunPhase::Failed);
        assert!(
            state
                .first_failure()
                .is_some_and(|status| status.status == StepOutcome::Failed)
        );
        assert!(!state.recover_interrupted());
    }

    #[test]
    fn state_roundtrips_through_json() {
        let mut state = RunState::new(Mode::Enterprise, "0.1.0");
        state.begin_run(Mode::Enterprise, "0.1.0");
        state.record_success(BootstrapStep::Roles);
        state.record_failure("permissions", "boom");

        let encoded = serde_json::to_string(&state).unwrap_or_default();
        let decoded: Result<RunState, _> = serde_json::from_str(&encoded);
        assert_eq!(decoded.ok(), Some(state));
    }
}
