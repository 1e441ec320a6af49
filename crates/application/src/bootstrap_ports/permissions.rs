use async_trait::async_trait;
use uuid::Uuid;

use groundwork_core::AppResult;

/// Persisted permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRecord {
    /// Stable permission identifier.
    pub permission_id: Uuid,
    /// Unique permission key.
    pub name: String,
    /// Granted action.
    pub action: String,
    /// Resource subject.
    pub subject: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the permission is disabled.
    pub disabled: bool,
}

/// Input for permission creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermission {
    /// Unique permission key.
    pub name: String,
    /// Granted action.
    pub action: String,
    /// Resource subject.
    pub subject: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the permission starts disabled.
    pub disabled: bool,
}

/// Repository port for permissions.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Counts all permissions.
    async fn count_permissions(&self) -> AppResult<u64>;

    /// Finds a permission by name.
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>>;

    /// Creates a permission. Fails with a conflict when the name is taken.
    async fn create_permission(&self, permission: NewPermission) -> AppResult<PermissionRecord>;

    /// Lists all permissions ordered by name.
    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>>;
}
