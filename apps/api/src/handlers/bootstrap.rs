use axum::Json;
use axum::extract::{Path, State};
use groundwork_domain::Mode;
use tracing::info;

use crate::dto::{
    BackupResponse, ExecuteBootstrapRequest, PolicyCompilationResponse, RunStateResponse,
    SetModeRequest, ValidationResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn bootstrap_state_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<RunStateResponse>> {
    let run_state = state.bootstrap_service.state().await?;
    Ok(Json(RunStateResponse::from(run_state)))
}

pub async fn execute_bootstrap_handler(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteBootstrapRequest>,
) -> ApiResult<Json<RunStateResponse>> {
    info!(allow_reinit = payload.allow_reinit, "bootstrap requested over http");
    let run_state = state
        .bootstrap_service
        .execute(payload.allow_reinit)
        .await?;
    Ok(Json(RunStateResponse::from(run_state)))
}

pub async fn initialize_users_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<RunStateResponse>> {
    let run_state = state.bootstrap_service.initialize_users().await?;
    Ok(Json(RunStateResponse::from(run_state)))
}

pub async fn initialize_organizations_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<RunStateResponse>> {
    let run_state = state.bootstrap_service.initialize_organizations().await?;
    Ok(Json(RunStateResponse::from(run_state)))
}

pub async fn reset_bootstrap_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<RunStateResponse>> {
    let run_state = state.bootstrap_service.reset_initialization().await?;
    Ok(Json(RunStateResponse::from(run_state)))
}

pub async fn set_mode_handler(
    State(state): State<AppState>,
    Json(payload): Json<SetModeRequest>,
) -> ApiResult<Json<RunStateResponse>> {
    let mode = Mode::from_transport(payload.mode.as_str());
    let run_state = state.bootstrap_service.set_mode(mode).await?;
    Ok(Json(RunStateResponse::from(run_state)))
}

pub async fn list_backups_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BackupResponse>>> {
    let backups = state.bootstrap_service.list_backups().await?;
    Ok(Json(backups.into_iter().map(BackupResponse::from).collect()))
}

pub async fn create_backup_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<BackupResponse>> {
    let backup = state.bootstrap_service.create_backup().await?;
    Ok(Json(BackupResponse::from(backup)))
}

pub async fn restore_backup_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<RunStateResponse>> {
    let run_state = state.bootstrap_service.restore_backup(key.as_str()).await?;
    Ok(Json(RunStateResponse::from(run_state)))
}

pub async fn validation_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ValidationResponse>> {
    let report = state.bootstrap_service.validate().await?;
    Ok(Json(ValidationResponse::from(report)))
}

pub async fn compile_policies_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<PolicyCompilationResponse>> {
    let report = state.bootstrap_service.compile_policies().await?;
    Ok(Json(PolicyCompilationResponse::from(report)))
}

#[cfg(test)]
mod tests;
