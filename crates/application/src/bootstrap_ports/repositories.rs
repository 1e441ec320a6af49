use std::sync::Arc;

use super::dictionaries::DictionaryRepository;
use super::menus::MenuRepository;
use super::options::OptionRepository;
use super::organizations::OrganizationRepository;
use super::permissions::PermissionRepository;
use super::policies::PolicyRepository;
use super::roles::RoleRepository;
use super::tenants::TenantRepository;
use super::users::UserRepository;

/// Persistence ports consumed by the bootstrap service.
#[derive(Clone)]
pub struct BootstrapRepositories {
    /// Roles and role-permission links.
    pub roles: Arc<dyn RoleRepository>,
    /// Permissions.
    pub permissions: Arc<dyn PermissionRepository>,
    /// Tenants.
    pub tenants: Arc<dyn TenantRepository>,
    /// Users, role bindings and employees.
    pub users: Arc<dyn UserRepository>,
    /// Menus.
    pub menus: Arc<dyn MenuRepository>,
    /// Options and the persisted run state.
    pub options: Arc<dyn OptionRepository>,
    /// Dictionaries.
    pub dictionaries: Arc<dyn DictionaryRepository>,
    /// Organizational units.
    pub organizations: Arc<dyn OrganizationRepository>,
    /// Authorization tuples.
    pub policies: Arc<dyn PolicyRepository>,
}

impl BootstrapRepositories {
    /// Uses one store for every port.
    #[must_use]
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: RoleRepository
            + PermissionRepository
            + TenantRepository
            + UserRepository
            + MenuRepository
            + OptionRepository
            + DictionaryRepository
            + OrganizationRepository
            + PolicyRepository
            + 'static,
    {
        Self {
            roles: store.clone(),
            permissions: store.clone(),
            tenants: store.clone(),
            users: store.clone(),
            menus: store.clone(),
            options: store.clone(),
            dictionaries: store.clone(),
            organizations: store.clone(),
            policies: store,
        }
    }
}
