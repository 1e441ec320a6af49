use async_trait::async_trait;
use uuid::Uuid;

use groundwork_application::{
    EmployeeRecord, NewEmployee, NewPermission, NewRole, NewTenant, NewUser, PermissionRecord,
    PermissionRepository, RoleRecord, RoleRepository, TenantRecord, TenantRepository, UserRecord,
    UserRepository, UserRoleBinding,
};
use groundwork_core::{AppError, AppResult, TenantId};
use groundwork_domain::UserId;

use super::InMemoryBootstrapStore;

#[async_trait]
impl RoleRepository for InMemoryBootstrapStore {
    async fn count_roles(&self) -> AppResult<u64> {
        Ok(self.roles.read().await.len() as u64)
    }

    async fn find_role_by_slug(&self, slug: &str) -> AppResult<Option<RoleRecord>> {
        Ok(self.roles.read().await.get(slug).cloned())
    }

    async fn create_role(&self, role: NewRole) -> AppResult<RoleRecord> {
        let mut roles = self.roles.write().await;
        if roles.contains_key(&role.slug) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.slug
            )));
        }

        let record = RoleRecord {
            role_id: Uuid::new_v4(),
            slug: role.slug,
            name: role.name,
            disabled: role.disabled,
            description: role.description,
        };
        roles.insert(record.slug.clone(), record.clone());
        Ok(record)
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        Ok(self.roles.read().await.values().cloned().collect())
    }

    async fn list_role_permissions(&self, role_id: Uuid) -> AppResult<Vec<PermissionRecord>> {
        let links = self.role_permissions.read().await;
        let permissions = self.permissions.read().await;

        Ok(permissions
            .values()
            .filter(|permission| links.contains(&(role_id, permission.permission_id)))
            .cloned()
            .collect())
    }

    async fn assign_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<()> {
        if !self
            .roles
            .read()
            .await
            .values()
            .any(|role| role.role_id == role_id)
        {
            return Err(AppError::NotFound(format!("role '{role_id}' not found")));
        }

        self.role_permissions
            .write()
            .await
            .insert((role_id, permission_id));
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for InMemoryBootstrapStore {
    async fn count_permissions(&self) -> AppResult<u64> {
        Ok(self.permissions.read().await.len() as u64)
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>> {
        Ok(self.permissions.read().await.get(name).cloned())
    }

    async fn create_permission(&self, permission: NewPermission) -> AppResult<PermissionRecord> {
        let mut permissions = self.permissions.write().await;
        if permissions.contains_key(&permission.name) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                permission.name
            )));
        }

        let record = PermissionRecord {
            permission_id: Uuid::new_v4(),
            name: permission.name,
            action: permission.action,
            subject: permission.subject,
            description: permission.description,
            disabled: permission.disabled,
        };
        permissions.insert(record.name.clone(), record.clone());
        Ok(record)
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        Ok(self.permissions.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl TenantRepository for InMemoryBootstrapStore {
    async fn count_tenants(&self) -> AppResult<u64> {
        Ok(self.tenants.read().await.len() as u64)
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> AppResult<Option<TenantRecord>> {
        Ok(self.tenants.read().await.get(slug).cloned())
    }

    async fn create_tenant(&self, tenant: NewTenant) -> AppResult<TenantRecord> {
        let mut tenants = self.tenants.write().await;
        if tenants.contains_key(&tenant.slug) {
            return Err(AppError::Conflict(format!(
                "tenant '{}' already exists",
                tenant.slug
            )));
        }

        let record = TenantRecord {
            tenant_id: TenantId::new(),
            slug: tenant.slug,
            name: tenant.name,
            description: tenant.description,
            parent_id: tenant.parent_id,
        };
        tenants.insert(record.slug.clone(), record.clone());
        Ok(record)
    }

    async fn list_tenants(&self) -> AppResult<Vec<TenantRecord>> {
        Ok(self.tenants.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryBootstrapStore {
    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                user.username
            )));
        }

        let record = UserRecord {
            user_id: UserId::new(),
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            tenant_id: user.tenant_id,
        };
        self.password_hashes
            .write()
            .await
            .insert(record.user_id, user.password_hash);
        users.insert(record.username.clone(), record.clone());
        Ok(record)
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn bind_role(&self, binding: UserRoleBinding) -> AppResult<()> {
        self.role_bindings.write().await.insert(binding);
        Ok(())
    }

    async fn list_role_bindings(
        &self,
        user_id: Option<UserId>,
    ) -> AppResult<Vec<UserRoleBinding>> {
        Ok(self
            .role_bindings
            .read()
            .await
            .iter()
            .filter(|binding| user_id.is_none_or(|user_id| binding.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn find_employee_by_user(&self, user_id: UserId) -> AppResult<Option<EmployeeRecord>> {
        Ok(self
            .employees
            .read()
            .await
            .iter()
            .find(|employee| employee.user_id == user_id)
            .cloned())
    }

    async fn create_employee(&self, employee: NewEmployee) -> AppResult<EmployeeRecord> {
        let mut employees = self.employees.write().await;
        if employees.iter().any(|stored| {
            stored.user_id == employee.user_id
                || (stored.tenant_id == employee.tenant_id
                    && stored.employee_number == employee.employee_number)
        }) {
            return Err(AppError::Conflict(format!(
                "employee '{}' already exists",
                employee.employee_number
            )));
        }

        let record = EmployeeRecord {
            employee_id: Uuid::new_v4(),
            user_id: employee.user_id,
            tenant_id: employee.tenant_id,
            employee_number: employee.employee_number,
            department: employee.department,
            position: employee.position,
            manager_id: None,
        };
        employees.push(record.clone());
        Ok(record)
    }

    async fn list_employees(&self) -> AppResult<Vec<EmployeeRecord>> {
        Ok(self.employees.read().await.clone())
    }

    async fn set_employee_manager(&self, employee_id: Uuid, manager_id: UserId) -> AppResult<()> {
        let mut employees = self.employees.write().await;
        let employee = employees
            .iter_mut()
            .find(|employee| employee.employee_id == employee_id)
            .ok_or_else(|| AppError::NotFound(format!("employee '{employee_id}' not found")))?;

        employee.manager_id = Some(manager_id);
        Ok(())
    }
}
