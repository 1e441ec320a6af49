use std::collections::{BTreeMap, BTreeSet, HashMap};

use tokio::sync::RwLock;
use uuid::Uuid;

use groundwork_application::{
    DictionaryRecord, EmployeeRecord, MenuRecord, OptionRecord, OrganizationRecord,
    PermissionRecord, PolicyRecord, RoleRecord, TenantRecord, UserRecord, UserRoleBinding,
};
use groundwork_core::TenantId;
use groundwork_domain::UserId;

mod catalog;
mod identity;
mod policies;

/// In-memory implementation of every bootstrap persistence port.
///
/// Natural keys are unique per table, mirroring the relational schema, except
/// for policies which accept duplicates.
#[derive(Debug, Default)]
pub struct InMemoryBootstrapStore {
    roles: RwLock<BTreeMap<String, RoleRecord>>,
    role_permissions: RwLock<BTreeSet<(Uuid, Uuid)>>,
    permissions: RwLock<BTreeMap<String, PermissionRecord>>,
    tenants: RwLock<BTreeMap<String, TenantRecord>>,
    users: RwLock<BTreeMap<String, UserRecord>>,
    password_hashes: RwLock<HashMap<UserId, String>>,
    role_bindings: RwLock<BTreeSet<UserRoleBinding>>,
    employees: RwLock<Vec<EmployeeRecord>>,
    menus: RwLock<Vec<MenuRecord>>,
    options: RwLock<BTreeMap<(Option<TenantId>, String), OptionRecord>>,
    dictionaries: RwLock<BTreeMap<String, DictionaryRecord>>,
    organizations: RwLock<Vec<OrganizationRecord>>,
    policies: RwLock<Vec<PolicyRecord>>,
}

impl InMemoryBootstrapStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored password hash of a user.
    pub async fn password_hash(&self, user_id: UserId) -> Option<String> {
        self.password_hashes.read().await.get(&user_id).cloned()
    }
}
