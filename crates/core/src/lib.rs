//! Shared primitives for all Rust crates in Groundwork.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type used across Groundwork crates.
pub type AppResult<T> = Result<T, AppError>;

/// Tenant identifier used as the partition key for tenant-scoped resources
/// and as the policy domain of compiled authorization tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Creates a random tenant identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a tenant identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TenantId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but the operation is disabled by policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Operation requires bootstrap steps that have not run yet.
    #[error("not initialized: {0}")]
    NotInitialized(String),

    /// Bootstrap already completed and re-running it is not permitted.
    #[error("already initialized: {0}")]
    AlreadyInitialized(String),

    /// A required upstream entity (tenant, admin user, role) is missing.
    #[error("dependency missing: {0}")]
    DependencyMissing(String),

    /// The persistence layer rejected a create call.
    #[error("creation failed: {0}")]
    CreationFailed(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
