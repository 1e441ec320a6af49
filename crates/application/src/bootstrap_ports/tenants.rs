use async_trait::async_trait;

use groundwork_core::{AppResult, TenantId};

/// Persisted tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    /// Stable tenant identifier, also the policy domain.
    pub tenant_id: TenantId,
    /// Unique tenant key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Parent tenant.
    pub parent_id: Option<TenantId>,
}

/// Input for tenant creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    /// Unique tenant key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Parent tenant.
    pub parent_id: Option<TenantId>,
}

/// Repository port for tenants.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Counts all tenants.
    async fn count_tenants(&self) -> AppResult<u64>;

    /// Finds a tenant by slug.
    async fn find_tenant_by_slug(&self, slug: &str) -> AppResult<Option<TenantRecord>>;

    /// Creates a tenant. Fails with a conflict when the slug is taken.
    async fn create_tenant(&self, tenant: NewTenant) -> AppResult<TenantRecord>;

    /// Lists all tenants ordered by slug.
    async fn list_tenants(&self) -> AppResult<Vec<TenantRecord>>;
}
