use async_trait::async_trait;
use uuid::Uuid;

use groundwork_core::{AppResult, TenantId};
use groundwork_domain::{OrganizationKind, UserId};

/// Persisted organizational unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationRecord {
    /// Stable organization identifier.
    pub organization_id: Uuid,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Unit kind.
    pub kind: OrganizationKind,
    /// Parent unit.
    pub parent_id: Option<Uuid>,
    /// Unit leader.
    pub leader_id: Option<UserId>,
}

/// Input for organization creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Unit kind.
    pub kind: OrganizationKind,
    /// Parent unit.
    pub parent_id: Option<Uuid>,
    /// Unit leader.
    pub leader_id: Option<UserId>,
}

/// Repository port for organizational units.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Counts units in a tenant.
    async fn count_organizations(&self, tenant_id: TenantId) -> AppResult<u64>;

    /// Finds a unit by tenant and code.
    async fn find_organization_by_code(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> AppResult<Option<OrganizationRecord>>;

    /// Creates a unit.
    async fn create_organization(
        &self,
        organization: NewOrganization,
    ) -> AppResult<OrganizationRecord>;

    /// Lists units in a tenant.
    async fn list_organizations(&self, tenant_id: TenantId) -> AppResult<Vec<OrganizationRecord>>;
}
