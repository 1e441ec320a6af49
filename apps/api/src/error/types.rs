use serde::Serialize;

use crate::dto::RunStateResponse;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<RunStateResponse>,
}

impl ErrorResponse {
    pub(super) fn new(message: String, state: Option<RunStateResponse>) -> Self {
        Self { message, state }
    }
}
