use async_trait::async_trait;
use chrono::{DateTime, Utc};

use groundwork_core::{AppResult, TenantId};

/// Persisted key-value option. A `None` tenant denotes the global scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRecord {
    /// Owning tenant, `None` for global options.
    pub tenant_id: Option<TenantId>,
    /// Option key, unique per scope.
    pub key: String,
    /// Serialized value.
    pub value: String,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

/// Repository port for tenant-scoped and global options.
#[async_trait]
pub trait OptionRepository: Send + Sync {
    /// Counts options in one scope.
    async fn count_options(&self, tenant_id: Option<TenantId>) -> AppResult<u64>;

    /// Reads one option.
    async fn find_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
    ) -> AppResult<Option<OptionRecord>>;

    /// Creates an option. Fails with a conflict when the key exists in scope.
    async fn create_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
        value: &str,
    ) -> AppResult<OptionRecord>;

    /// Creates or replaces an option.
    async fn upsert_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
        value: &str,
    ) -> AppResult<OptionRecord>;

    /// Lists options in one scope whose key starts with `prefix`, ordered by key.
    async fn list_options(
        &self,
        tenant_id: Option<TenantId>,
        prefix: &str,
    ) -> AppResult<Vec<OptionRecord>>;
}
