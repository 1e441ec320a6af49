use async_trait::async_trait;
use uuid::Uuid;

use groundwork_core::AppResult;

use super::permissions::PermissionRecord;

/// Persisted role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Stable role identifier.
    pub role_id: Uuid,
    /// Unique role key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Whether the role is disabled.
    pub disabled: bool,
    /// Human-readable description.
    pub description: String,
}

/// Input for role creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Unique role key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Whether the role starts disabled.
    pub disabled: bool,
    /// Human-readable description.
    pub description: String,
}

/// Repository port for roles and their permission links.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Counts all roles.
    async fn count_roles(&self) -> AppResult<u64>;

    /// Finds a role by slug.
    async fn find_role_by_slug(&self, slug: &str) -> AppResult<Option<RoleRecord>>;

    /// Creates a role. Fails with a conflict when the slug is taken.
    async fn create_role(&self, role: NewRole) -> AppResult<RoleRecord>;

    /// Lists all roles ordered by slug.
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>>;

    /// Lists permissions linked to a role.
    async fn list_role_permissions(&self, role_id: Uuid) -> AppResult<Vec<PermissionRecord>>;

    /// Links a permission to a role.
    async fn assign_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<()>;
}
