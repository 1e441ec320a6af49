use chrono::Utc;
use tracing::{error, info, warn};

use groundwork_core::{AppError, AppResult};
use groundwork_domain::{BootstrapStep, RunPhase, RunState};

use super::{
    BOOTSTRAP_VERSION, BootstrapContext, BootstrapError, BootstrapService,
    PolicyCompilationReport, validate_catalog,
};

impl BootstrapService {
    /// Runs the full pipeline in dependency order and stops at the first
    /// failing step.
    ///
    /// An initialized state is only provisioned again when the caller asks
    /// for it and the configuration allows it.
    pub async fn execute(&self, allow_reinit: bool) -> Result<RunState, BootstrapError> {
        let mut slot = self.state.lock().await;
        let state = self.loaded_state(&mut slot).await?;

        if state.phase == RunPhase::Initialized
            && !(allow_reinit && self.config.allow_reinitialization)
        {
            return Err(AppError::AlreadyInitialized(
                "bootstrap has already completed".to_owned(),
            )
            .into());
        }

        let context = self.context_for(state);
        if let Err(error) = validate_catalog(context.loader()).into_result() {
            warn!(%error, "continuing with an inconsistent seed catalog");
        }

        if state.phase != RunPhase::NotInitialized {
            self.snapshot(state).await;
        }

        self.run_steps(state, &context, &BootstrapStep::PIPELINE)
            .await
    }

    /// Provisions users and everything they depend on, then compiles
    /// policies so new bindings take effect.
    pub async fn initialize_users(&self) -> Result<RunState, BootstrapError> {
        let mut steps = BootstrapStep::Users.closure();
        steps.push(BootstrapStep::Policies);
        self.run_slice(&steps).await
    }

    /// Provisions organization trees and everything they depend on, then
    /// compiles policies for the bindings of any users it created.
    pub async fn initialize_organizations(&self) -> Result<RunState, BootstrapError> {
        let mut steps = BootstrapStep::Organizations.closure();
        steps.push(BootstrapStep::Policies);
        self.run_slice(&steps).await
    }

    /// Runs only the policy compiler against the current store.
    pub async fn compile_policies(&self) -> AppResult<PolicyCompilationReport> {
        let mut slot = self.state.lock().await;
        let state = self.loaded_state(&mut slot).await?;
        if state.phase == RunPhase::NotInitialized {
            return Err(AppError::NotInitialized(
                "bootstrap must run before policies can be compiled".to_owned(),
            ));
        }

        let context = self.context_for(state);
        Ok(self.provisioners.policy_compiler().compile(&context).await)
    }

    async fn run_slice(&self, steps: &[BootstrapStep]) -> Result<RunState, BootstrapError> {
        let mut slot = self.state.lock().await;
        let state = self.loaded_state(&mut slot).await?;
        let context = self.context_for(state);

        self.run_steps(state, &context, steps).await
    }

    fn context_for(&self, state: &RunState) -> BootstrapContext {
        BootstrapContext::new(state.mode, self.seeds.loader(state.mode))
    }

    async fn snapshot(&self, state: &RunState) {
        match self.state_store.create_backup(state, Utc::now()).await {
            Ok(backup) => info!(key = backup.key.as_str(), "stored bootstrap state snapshot"),
            Err(error) => warn!(%error, "failed to snapshot bootstrap state"),
        }
    }

    async fn run_steps(
        &self,
        state: &mut RunState,
        context: &BootstrapContext,
        steps: &[BootstrapStep],
    ) -> Result<RunState, BootstrapError> {
        let previous = state.clone();
        state.begin_run(context.mode(), BOOTSTRAP_VERSION);
        if let Err(error) = self.state_store.save(state).await {
            *state = previous;
            return Err(error.into());
        }
        info!(mode = context.mode().as_str(), steps = steps.len(), "bootstrap run started");

        for step in steps {
            let component = step.component();
            match self.provisioners.for_step(*step).check(context).await {
                Ok(summary) => {
                    state.record_success(*step);
                    info!(
                        component,
                        created = summary.created,
                        skipped = summary.skipped,
                        repaired = summary.repaired,
                        "bootstrap step finished"
                    );
                }
                Err(source) => {
                    error!(component, error = %source, "bootstrap step failed");
                    state.record_failure(component, source.to_string());
                    if let Err(persist_error) = self.state_store.save(state).await {
                        error!(error = %persist_error, "failed to persist failed bootstrap state");
                    }

                    return Err(BootstrapError::StepFailed {
                        component: component.to_owned(),
                        source,
                        state: Box::new(state.clone()),
                    });
                }
            }
        }

        state.finish_run(Utc::now());
        if let Err(source) = self.state_store.save(state).await {
            return Err(BootstrapError::StatePersistence {
                source,
                state: Box::new(state.clone()),
            });
        }

        info!(
            phase = state.phase.as_str(),
            is_initialized = state.is_initialized,
            "bootstrap run finished"
        );
        Ok(state.clone())
    }
}
