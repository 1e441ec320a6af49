use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use groundwork_core::{AppError, AppResult};
use groundwork_domain::{BootstrapStep, EmailAddress, UserTemplate, Username};

use crate::bootstrap_ports::{
    NewEmployee, NewUser, PasswordHasher, RoleRepository, TenantRecord, TenantRepository,
    UserRecord, UserRepository, UserRoleBinding,
};

use super::super::context::BootstrapContext;
use super::super::guard::GuardDecision;
use super::assignments::RolePermissionAssigner;
use super::{ProvisionSummary, Provisioner, creation_failed, require_tenant};

/// Creates users, binds their roles, attaches employee profiles and resolves
/// managers once every user of the catalog exists.
pub(super) struct UserProvisioner {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    tenants: Arc<dyn TenantRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    assigner: RolePermissionAssigner,
}

impl UserProvisioner {
    pub(super) fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        tenants: Arc<dyn TenantRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        assigner: RolePermissionAssigner,
    ) -> Self {
        Self {
            users,
            roles,
            tenants,
            password_hasher,
            assigner,
        }
    }

    async fn create_user(
        &self,
        template: &UserTemplate,
        username: &Username,
        default_tenant: &TenantRecord,
    ) -> AppResult<UserRecord> {
        let email = EmailAddress::new(template.email.as_str())?;
        let tenant_id = match template.tenant_slug.as_deref() {
            Some(slug) if slug != default_tenant.slug => {
                require_tenant(self.tenants.as_ref(), slug).await?.tenant_id
            }
            _ => default_tenant.tenant_id,
        };
        let password_hash = self.password_hasher.hash_password(&template.password)?;

        self.users
            .create_user(NewUser {
                username: username.as_str().to_owned(),
                email: email.into(),
                display_name: template.display_name.clone(),
                password_hash,
                tenant_id,
            })
            .await
            .map_err(creation_failed("user", username.as_str()))
    }

    /// Binds missing template roles. Returns the number of bindings added.
    async fn bind_roles(&self, template: &UserTemplate, user: &UserRecord) -> AppResult<usize> {
        let bound = self.users.list_role_bindings(Some(user.user_id)).await?;
        let mut added = 0;

        for role_slug in &template.roles {
            if bound.iter().any(|binding| &binding.role_slug == role_slug) {
                continue;
            }

            if self.roles.find_role_by_slug(role_slug).await?.is_none() {
                return Err(AppError::DependencyMissing(format!(
                    "role '{role_slug}' required by user '{}' does not exist",
                    user.username
                )));
            }

            self.users
                .bind_role(UserRoleBinding {
                    user_id: user.user_id,
                    role_slug: role_slug.clone(),
                    tenant_id: user.tenant_id,
                })
                .await
                .map_err(creation_failed(
                    "user-role binding",
                    &format!("{} -> {role_slug}", user.username),
                ))?;
            added += 1;
        }

        Ok(added)
    }

    /// Creates the employee profile without a manager. Returns whether one was
    /// created.
    async fn attach_employee(&self, template: &UserTemplate, user: &UserRecord) -> AppResult<bool> {
        let Some(employee) = template.employee.as_ref() else {
            return Ok(false);
        };
        if self.users.find_employee_by_user(user.user_id).await?.is_some() {
            return Ok(false);
        }

        self.users
            .create_employee(NewEmployee {
                user_id: user.user_id,
                tenant_id: user.tenant_id,
                employee_number: employee.employee_number.clone(),
                department: employee.department.clone(),
                position: employee.position.clone(),
            })
            .await
            .map_err(creation_failed("employee", &employee.employee_number))?;

        Ok(true)
    }

    /// Points employees at their managers. Runs after every user exists so
    /// forward references resolve. Returns the number of links written.
    async fn resolve_managers(&self, context: &BootstrapContext) -> AppResult<usize> {
        let mut linked = 0;

        for template in context.loader().users() {
            let Some(manager_username) = template
                .employee
                .as_ref()
                .and_then(|employee| employee.manager.as_deref())
            else {
                continue;
            };

            let username = Username::new(template.username.as_str())?;
            let Some(user) = self.users.find_user_by_username(username.as_str()).await? else {
                continue;
            };
            let Some(employee) = self.users.find_employee_by_user(user.user_id).await? else {
                continue;
            };

            let manager_username = Username::new(manager_username)?;
            let Some(manager) = self
                .users
                .find_user_by_username(manager_username.as_str())
                .await?
            else {
                warn!(
                    username = username.as_str(),
                    manager = manager_username.as_str(),
                    "manager not found, leaving employee without manager"
                );
                continue;
            };

            if employee.manager_id == Some(manager.user_id) {
                continue;
            }

            self.users
                .set_employee_manager(employee.employee_id, manager.user_id)
                .await?;
            linked += 1;
        }

        Ok(linked)
    }
}

#[async_trait]
impl Provisioner for UserProvisioner {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let default_tenant =
            require_tenant(self.tenants.as_ref(), context.default_tenant_slug()).await?;
        let existing = self.users.count_users().await?;
        let decision = GuardDecision::for_count(BootstrapStep::Users, existing);
        let mut summary = ProvisionSummary::default();
        let mut links = 0;

        if decision == GuardDecision::Verify {
            info!(component = "users", existing, "users already present, verifying links");
            summary.repaired += self.assigner.ensure(context).await?;
        }

        for template in context.loader().users() {
            let username = Username::new(template.username.as_str())?;
            let user = match self.users.find_user_by_username(username.as_str()).await? {
                Some(user) => {
                    summary.skipped += 1;
                    user
                }
                None if decision == GuardDecision::Provision => {
                    let user = self.create_user(template, &username, &default_tenant).await?;
                    summary.created += 1;
                    user
                }
                None => continue,
            };

            links += self.bind_roles(template, &user).await?;
            if self.attach_employee(template, &user).await? {
                links += 1;
            }
        }

        links += self.resolve_managers(context).await?;
        if decision == GuardDecision::Provision {
            summary.created += links;
        } else {
            summary.repaired += links;
        }

        Ok(summary)
    }
}
