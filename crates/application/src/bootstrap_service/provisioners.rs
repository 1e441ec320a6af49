use std::sync::Arc;

use async_trait::async_trait;

use groundwork_core::{AppError, AppResult};
use groundwork_domain::{BootstrapStep, ResourceActionMap};

use crate::bootstrap_ports::{
    BootstrapRepositories, PasswordHasher, TenantRecord, TenantRepository,
};

use super::context::BootstrapContext;
use super::policy_compiler::PolicyCompiler;

mod assignments;
mod dictionaries;
mod menus;
mod options;
mod organizations;
mod permissions;
mod roles;
mod tenants;
mod users;

use assignments::RolePermissionAssigner;
use dictionaries::DictionaryProvisioner;
use menus::MenuProvisioner;
use options::OptionProvisioner;
use organizations::OrganizationProvisioner;
use permissions::PermissionProvisioner;
use roles::RoleProvisioner;
use tenants::TenantProvisioner;
use users::UserProvisioner;

/// Row counts reported by one provisioner call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ProvisionSummary {
    /// Rows or links created.
    pub(crate) created: usize,
    /// Templates whose row already existed.
    pub(crate) skipped: usize,
    /// Links or references repaired on a populated store.
    pub(crate) repaired: usize,
}

/// One pipeline step that creates its missing rows.
#[async_trait]
pub(crate) trait Provisioner: Send + Sync {
    /// Creates whatever the catalog declares and the store lacks.
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary>;
}

/// Every provisioner, addressed by step.
pub(crate) struct Provisioners {
    roles: RoleProvisioner,
    permissions: PermissionProvisioner,
    tenants: TenantProvisioner,
    users: UserProvisioner,
    policies: PolicyCompiler,
    menus: MenuProvisioner,
    options: OptionProvisioner,
    dictionaries: DictionaryProvisioner,
    organizations: OrganizationProvisioner,
}

impl Provisioners {
    pub(crate) fn new(
        repositories: &BootstrapRepositories,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let assigner = RolePermissionAssigner::new(
            repositories.roles.clone(),
            repositories.permissions.clone(),
        );

        Self {
            roles: RoleProvisioner::new(repositories.roles.clone(), assigner.clone()),
            permissions: PermissionProvisioner::new(
                repositories.permissions.clone(),
                assigner.clone(),
            ),
            tenants: TenantProvisioner::new(repositories.tenants.clone()),
            users: UserProvisioner::new(
                repositories.users.clone(),
                repositories.roles.clone(),
                repositories.tenants.clone(),
                password_hasher,
                assigner,
            ),
            policies: PolicyCompiler::new(
                repositories.roles.clone(),
                repositories.tenants.clone(),
                repositories.users.clone(),
                repositories.policies.clone(),
                ResourceActionMap::standard(),
            ),
            menus: MenuProvisioner::new(repositories.menus.clone()),
            options: OptionProvisioner::new(
                repositories.options.clone(),
                repositories.tenants.clone(),
            ),
            dictionaries: DictionaryProvisioner::new(repositories.dictionaries.clone()),
            organizations: OrganizationProvisioner::new(
                repositories.organizations.clone(),
                repositories.tenants.clone(),
                repositories.users.clone(),
            ),
        }
    }

    pub(crate) fn policy_compiler(&self) -> &PolicyCompiler {
        &self.policies
    }

    pub(crate) fn for_step(&self, step: BootstrapStep) -> &dyn Provisioner {
        match step {
            BootstrapStep::Roles => &self.roles,
            BootstrapStep::Permissions => &self.permissions,
            BootstrapStep::Tenants => &self.tenants,
            BootstrapStep::Users => &self.users,
            BootstrapStep::Policies => &self.policies,
            BootstrapStep::Menus => &self.menus,
            BootstrapStep::Options => &self.options,
            BootstrapStep::Dictionaries => &self.dictionaries,
            BootstrapStep::Organizations => &self.organizations,
        }
    }
}

/// Wraps a persistence error raised while creating one seeded item.
fn creation_failed(kind: &'static str, key: &str) -> impl FnOnce(AppError) -> AppError {
    let key = key.to_owned();
    move |error| AppError::CreationFailed(format!("failed to create {kind} '{key}': {error}"))
}

/// Loads a tenant every row of a step depends on.
async fn require_tenant(tenants: &dyn TenantRepository, slug: &str) -> AppResult<TenantRecord> {
    tenants.find_tenant_by_slug(slug).await?.ok_or_else(|| {
        AppError::DependencyMissing(format!("tenant '{slug}' does not exist"))
    })
}
