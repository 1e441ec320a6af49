use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use groundwork_application::{
    BootstrapConfig, BootstrapRepositories, BootstrapService, PasswordHasher,
};
use groundwork_core::AppResult;
use groundwork_domain::{Mode, RunPhase};
use groundwork_infrastructure::{BuiltinSeedSource, InMemoryBootstrapStore};

use super::{
    bootstrap_state_handler, compile_policies_handler, create_backup_handler,
    execute_bootstrap_handler, initialize_users_handler, list_backups_handler,
    reset_bootstrap_handler, restore_backup_handler, set_mode_handler, validation_handler,
};
use crate::dto::{ExecuteBootstrapRequest, SetModeRequest};
use crate::error::ApiError;
use crate::state::AppState;

struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

fn app_state(config: BootstrapConfig) -> AppState {
    AppState {
        bootstrap_service: BootstrapService::new(
            BootstrapRepositories::from_store(Arc::new(InMemoryBootstrapStore::new())),
            Arc::new(BuiltinSeedSource::new()),
            Arc::new(PlainPasswordHasher),
            config,
        ),
        bootstrap_token: "test-token".to_owned(),
    }
}

fn company_state() -> AppState {
    app_state(BootstrapConfig {
        initial_mode: Mode::Company,
        ..BootstrapConfig::default()
    })
}

fn status_of(error: ApiError) -> StatusCode {
    error.into_response().status()
}

async fn execute(state: &AppState, allow_reinit: bool) -> Result<RunPhase, StatusCode> {
    execute_bootstrap_handler(
        State(state.clone()),
        Json(ExecuteBootstrapRequest { allow_reinit }),
    )
    .await
    .map(|Json(response)| response.phase)
    .map_err(status_of)
}

#[tokio::test]
async fn execute_initializes_and_state_reports_it() {
    let state = company_state();

    assert_eq!(execute(&state, false).await, Ok(RunPhase::Initialized));

    let reported = bootstrap_state_handler(State(state)).await;
    let Ok(Json(reported)) = reported else {
        panic!("state should load");
    };
    assert!(reported.is_initialized);
    assert_eq!(reported.mode, Mode::Company);
    assert_eq!(reported.statuses.len(), 9);
}

#[tokio::test]
async fn second_execute_without_reinit_is_a_conflict() {
    let state = company_state();
    assert!(execute(&state, false).await.is_ok());

    assert_eq!(execute(&state, false).await, Err(StatusCode::CONFLICT));
    assert_eq!(execute(&state, true).await, Err(StatusCode::CONFLICT));
}

#[tokio::test]
async fn initialize_users_leaves_the_run_partial() {
    let state = company_state();

    let response = initialize_users_handler(State(state)).await;
    assert!(response.is_ok_and(|Json(response)| {
        response.phase == RunPhase::Partial && !response.is_initialized
    }));
}

#[tokio::test]
async fn mode_requests_fall_back_to_website_and_are_pinned() {
    let state = company_state();

    let unknown = set_mode_handler(
        State(state.clone()),
        Json(SetModeRequest {
            mode: "unknown".to_owned(),
        }),
    )
    .await;
    assert!(unknown.is_ok_and(|Json(response)| response.mode == Mode::Website));

    let switched = set_mode_handler(
        State(state.clone()),
        Json(SetModeRequest {
            mode: "Enterprise".to_owned(),
        }),
    )
    .await;
    assert!(switched.is_ok_and(|Json(response)| response.mode == Mode::Enterprise));

    assert!(execute(&state, false).await.is_ok());
    let pinned = set_mode_handler(
        State(state),
        Json(SetModeRequest {
            mode: "website".to_owned(),
        }),
    )
    .await;
    assert_eq!(pinned.err().map(status_of), Some(StatusCode::CONFLICT));
}

#[tokio::test]
async fn reset_is_forbidden_unless_enabled() {
    let state = company_state();
    assert!(execute(&state, false).await.is_ok());

    let response = reset_bootstrap_handler(State(state)).await;
    assert_eq!(response.err().map(status_of), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn compiling_policies_before_any_run_is_a_failed_precondition() {
    let state = company_state();

    let response = compile_policies_handler(State(state.clone())).await;
    assert_eq!(
        response.err().map(status_of),
        Some(StatusCode::PRECONDITION_FAILED)
    );

    assert!(execute(&state, false).await.is_ok());
    let recompiled = compile_policies_handler(State(state)).await;
    assert!(recompiled.is_ok_and(|Json(report)| {
        report.total_inserted == 0 && report.failed_passes.is_empty()
    }));
}

#[tokio::test]
async fn backups_can_be_listed_and_restored() {
    let state = app_state(BootstrapConfig {
        allow_reset: true,
        ..BootstrapConfig::default()
    });
    assert!(execute(&state, false).await.is_ok());

    let backup = create_backup_handler(State(state.clone())).await;
    let Ok(Json(backup)) = backup else {
        panic!("backup should be created");
    };
    assert_eq!(backup.phase, RunPhase::Initialized);

    assert!(reset_bootstrap_handler(State(state.clone())).await.is_ok());

    let listed = list_backups_handler(State(state.clone())).await;
    assert!(listed.is_ok_and(|Json(backups)| backups.iter().any(|item| item.key == backup.key)));

    let restored = restore_backup_handler(State(state.clone()), Path(backup.key)).await;
    assert!(restored.is_ok_and(|Json(response)| response.is_initialized));

    let missing =
        restore_backup_handler(State(state), Path("bootstrap.backup.0".to_owned())).await;
    assert_eq!(missing.err().map(status_of), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn builtin_catalog_validates_cleanly() {
    let state = company_state();

    let response = validation_handler(State(state)).await;
    assert!(response.is_ok_and(|Json(report)| report.clean && report.issues.is_empty()));
}
