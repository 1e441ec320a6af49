use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use groundwork_application::BootstrapError;
use groundwork_core::AppError;
use groundwork_domain::RunState;

use crate::dto::RunStateResponse;

mod types;

pub use types::ErrorResponse;

/// HTTP API error wrapper around application errors.
///
/// Carries the run state when a bootstrap step failed so callers see which
/// steps completed.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    state: Option<Box<RunState>>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.error {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::AlreadyInitialized(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotInitialized(_) => StatusCode::PRECONDITION_FAILED,
            AppError::DependencyMissing(_) => StatusCode::FAILED_DEPENDENCY,
            AppError::CreationFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self {
            error: value,
            state: None,
        }
    }
}

impl From<BootstrapError> for ApiError {
    fn from(value: BootstrapError) -> Self {
        match value {
            BootstrapError::Rejected(error) => Self::from(error),
            BootstrapError::StepFailed {
                component,
                source,
                state,
            } => Self {
                error: AppError::Internal(format!("bootstrap step '{component}' failed: {source}")),
                state: Some(state),
            },
            BootstrapError::StatePersistence { source, state } => Self {
                error: source,
                state: Some(state),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = Json(ErrorResponse::new(
            self.error.to_string(),
            self.state.map(|state| RunStateResponse::from(*state)),
        ));

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use groundwork_application::BootstrapError;
    use groundwork_core::AppError;
    use groundwork_domain::{Mode, RunState};

    use super::ApiError;

    #[test]
    fn bootstrap_taxonomy_maps_to_distinct_statuses() {
        let cases = [
            (AppError::AlreadyInitialized("done".to_owned()), StatusCode::CONFLICT),
            (AppError::NotInitialized("pending".to_owned()), StatusCode::PRECONDITION_FAILED),
            (AppError::DependencyMissing("tenant".to_owned()), StatusCode::FAILED_DEPENDENCY),
            (AppError::CreationFailed("role".to_owned()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn failed_step_response_carries_the_run_state() {
        let mut state = RunState::new(Mode::Company, "test");
        state.record_failure("menus", "boom");
        let response = ApiError::from(BootstrapError::StepFailed {
            component: "menus".to_owned(),
            source: AppError::CreationFailed("boom".to_owned()),
            state: Box::new(state),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await;
        let payload: serde_json::Value = body
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default();
        assert_eq!(payload["state"]["phase"], "failed");
        assert_eq!(payload["state"]["statuses"][0]["component"], "menus");
        assert!(
            payload["message"]
                .as_str()
                .is_some_and(|message| message.contains("menus"))
        );
    }
}
