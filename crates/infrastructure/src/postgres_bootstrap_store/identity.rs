use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use groundwork_application::{
    EmployeeRecord, NewEmployee, NewPermission, NewRole, NewTenant, NewUser, PermissionRecord,
    PermissionRepository, RoleRecord, RoleRepository, TenantRecord, TenantRepository, UserRecord,
    UserRepository, UserRoleBinding,
};
use groundwork_core::{AppError, AppResult, TenantId};
use groundwork_domain::UserId;

use super::{PostgresBootstrapStore, insert_error, row_count};

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    slug: String,
    name: String,
    disabled: bool,
    description: String,
}

impl From<RoleRow> for RoleRecord {
    fn from(row: RoleRow) -> Self {
        Self {
            role_id: row.id,
            slug: row.slug,
            name: row.name,
            disabled: row.disabled,
            description: row.description,
        }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: Uuid,
    name: String,
    action: String,
    subject: String,
    description: String,
    disabled: bool,
}

impl From<PermissionRow> for PermissionRecord {
    fn from(row: PermissionRow) -> Self {
        Self {
            permission_id: row.id,
            name: row.name,
            action: row.action,
            subject: row.subject,
            description: row.description,
            disabled: row.disabled,
        }
    }
}

#[derive(Debug, FromRow)]
struct TenantRow {
    id: Uuid,
    slug: String,
    name: String,
    description: String,
    parent_id: Option<Uuid>,
}

impl From<TenantRow> for TenantRecord {
    fn from(row: TenantRow) -> Self {
        Self {
            tenant_id: TenantId::from_uuid(row.id),
            slug: row.slug,
            name: row.name,
            description: row.description,
            parent_id: row.parent_id.map(TenantId::from_uuid),
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    display_name: String,
    tenant_id: Uuid,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            display_name: row.display_name,
            tenant_id: TenantId::from_uuid(row.tenant_id),
        }
    }
}

#[derive(Debug, FromRow)]
struct BindingRow {
    user_id: Uuid,
    role_slug: String,
    tenant_id: Uuid,
}

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: Uuid,
    user_id: Uuid,
    tenant_id: Uuid,
    employee_number: String,
    department: Option<String>,
    position: String,
    manager_id: Option<Uuid>,
}

impl From<EmployeeRow> for EmployeeRecord {
    fn from(row: EmployeeRow) -> Self {
        Self {
            employee_id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            employee_number: row.employee_number,
            department: row.department,
            position: row.position,
            manager_id: row.manager_id.map(UserId::from_uuid),
        }
    }
}

#[async_trait]
impl RoleRepository for PostgresBootstrapStore {
    async fn count_roles(&self) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await
            .map(row_count)
            .map_err(|error| AppError::Internal(format!("failed to count roles: {error}")))
    }

    async fn find_role_by_slug(&self, slug: &str) -> AppResult<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, slug, name, disabled, description
            FROM roles
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{slug}': {error}")))?;

        Ok(row.map(RoleRecord::from))
    }

    async fn create_role(&self, role: NewRole) -> AppResult<RoleRecord> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, slug, name, disabled, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, slug, name, disabled, description
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(role.slug.as_str())
        .bind(role.name.as_str())
        .bind(role.disabled)
        .bind(role.description.as_str())
        .fetch_one(&self.pool)
        .await
        .map(RoleRecord::from)
        .map_err(|error| insert_error(error, &format!("role '{}'", role.slug)))
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, slug, name, disabled, description
            FROM roles
            ORDER BY slug
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(rows.into_iter().map(RoleRecord::from).collect())
    }

    async fn list_role_permissions(&self, role_id: Uuid) -> AppResult<Vec<PermissionRecord>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT p.id, p.name, p.action, p.subject, p.description, p.disabled
            FROM permissions p
            INNER JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list permissions of role '{role_id}': {error}"
            ))
        })?;

        Ok(rows.into_iter().map(PermissionRecord::from).collect())
    }

    async fn assign_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to assign permission '{permission_id}' to role '{role_id}': {error}"
            ))
        })?;

        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for PostgresBootstrapStore {
    async fn count_permissions(&self) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM permissions")
            .fetch_one(&self.pool)
            .await
            .map(row_count)
            .map_err(|error| AppError::Internal(format!("failed to count permissions: {error}")))
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, action, subject, description, disabled
            FROM permissions
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permission '{name}': {error}"))
        })?;

        Ok(row.map(PermissionRecord::from))
    }

    async fn create_permission(&self, permission: NewPermission) -> AppResult<PermissionRecord> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (id, name, action, subject, description, disabled)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, action, subject, description, disabled
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(permission.name.as_str())
        .bind(permission.action.as_str())
        .bind(permission.subject.as_str())
        .bind(permission.description.as_str())
        .bind(permission.disabled)
        .fetch_one(&self.pool)
        .await
        .map(PermissionRecord::from)
        .map_err(|error| insert_error(error, &format!("permission '{}'", permission.name)))
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, action, subject, description, disabled
            FROM permissions
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        Ok(rows.into_iter().map(PermissionRecord::from).collect())
    }
}

#[async_trait]
impl TenantRepository for PostgresBootstrapStore {
    async fn count_tenants(&self) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tenants")
            .fetch_one(&self.pool)
            .await
            .map(row_count)
            .map_err(|error| AppError::Internal(format!("failed to count tenants: {error}")))
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> AppResult<Option<TenantRecord>> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, slug, name, description, parent_id
            FROM tenants
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find tenant '{slug}': {error}")))?;

        Ok(row.map(TenantRecord::from))
    }

    async fn create_tenant(&self, tenant: NewTenant) -> AppResult<TenantRecord> {
        sqlx::query_as::<_, TenantRow>(
            r#"
            INSERT INTO tenants (id, slug, name, description, parent_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, slug, name, description, parent_id
            "#,
        )
        .bind(TenantId::new().as_uuid())
        .bind(tenant.slug.as_str())
        .bind(tenant.name.as_str())
        .bind(tenant.description.as_str())
        .bind(tenant.parent_id.map(|parent_id| parent_id.as_uuid()))
        .fetch_one(&self.pool)
        .await
        .map(TenantRecord::from)
        .map_err(|error| insert_error(error, &format!("tenant '{}'", tenant.slug)))
    }

    async fn list_tenants(&self) -> AppResult<Vec<TenantRecord>> {
        let rows = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, slug, name, description, parent_id
            FROM tenants
            ORDER BY slug
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list tenants: {error}")))?;

        Ok(rows.into_iter().map(TenantRecord::from).collect())
    }
}

#[async_trait]
impl UserRepository for PostgresBootstrapStore {
    async fn count_users(&self) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map(row_count)
            .map_err(|error| AppError::Internal(format!("failed to count users: {error}")))
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, display_name, tenant_id
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find user '{username}': {error}"))
        })?;

        Ok(row.map(UserRecord::from))
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, display_name, password_hash, tenant_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, display_name, tenant_id
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.tenant_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map(UserRecord::from)
        .map_err(|error| insert_error(error, &format!("user '{}'", user.username)))
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, display_name, tenant_id
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn bind_role(&self, binding: UserRoleBinding) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_role_bindings (user_id, role_slug, tenant_id)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(binding.user_id.as_uuid())
        .bind(binding.role_slug.as_str())
        .bind(binding.tenant_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to bind role '{}' to user '{}': {error}",
                binding.role_slug, binding.user_id
            ))
        })?;

        Ok(())
    }

    async fn list_role_bindings(
        &self,
        user_id: Option<UserId>,
    ) -> AppResult<Vec<UserRoleBinding>> {
        let rows = sqlx::query_as::<_, BindingRow>(
            r#"
            SELECT user_id, role_slug, tenant_id
            FROM user_role_bindings
            WHERE $1::UUID IS NULL OR user_id = $1
            ORDER BY user_id, role_slug, tenant_id
            "#,
        )
        .bind(user_id.map(|user_id| user_id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role bindings: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| UserRoleBinding {
                user_id: UserId::from_uuid(row.user_id),
                role_slug: row.role_slug,
                tenant_id: TenantId::from_uuid(row.tenant_id),
            })
            .collect())
    }

    async fn find_employee_by_user(&self, user_id: UserId) -> AppResult<Option<EmployeeRecord>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, user_id, tenant_id, employee_number, department, position, manager_id
            FROM employees
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find employee of user '{user_id}': {error}"))
        })?;

        Ok(row.map(EmployeeRecord::from))
    }

    async fn create_employee(&self, employee: NewEmployee) -> AppResult<EmployeeRecord> {
        sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees (id, user_id, tenant_id, employee_number, department, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, tenant_id, employee_number, department, position, manager_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(employee.user_id.as_uuid())
        .bind(employee.tenant_id.as_uuid())
        .bind(employee.employee_number.as_str())
        .bind(employee.department.as_deref())
        .bind(employee.position.as_str())
        .fetch_one(&self.pool)
        .await
        .map(EmployeeRecord::from)
        .map_err(|error| {
            insert_error(
                error,
                &format!("employee '{}'", employee.employee_number),
            )
        })
    }

    async fn list_employees(&self) -> AppResult<Vec<EmployeeRecord>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, user_id, tenant_id, employee_number, department, position, manager_id
            FROM employees
            ORDER BY tenant_id, employee_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list employees: {error}")))?;

        Ok(rows.into_iter().map(EmployeeRecord::from).collect())
    }

    async fn set_employee_manager(&self, employee_id: Uuid, manager_id: UserId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET manager_id = $2
            WHERE id = $1
            "#,
        )
        .bind(employee_id)
        .bind(manager_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to set manager of employee '{employee_id}': {error}"
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "employee '{employee_id}' not found"
            )));
        }

        Ok(())
    }
}
