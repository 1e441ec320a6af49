use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use groundwork_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

pub const BOOTSTRAP_TOKEN_HEADER: &str = "x-bootstrap-token";

pub async fn require_bootstrap_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let presented = request
        .headers()
        .get(BOOTSTRAP_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("bootstrap token required".to_owned()))?;

    if !tokens_match(presented, state.bootstrap_token.as_str()) {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    Ok(next.run(request).await)
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(presented: &str, expected: &str) -> bool {
    presented.len() == expected.len()
        && presented
            .bytes()
            .zip(expected.bytes())
            .fold(0_u8, |difference, (left, right)| difference | (left ^ right))
            == 0
}
