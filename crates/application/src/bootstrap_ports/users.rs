use async_trait::async_trait;
use uuid::Uuid;

use groundwork_core::{AppResult, TenantId};
use groundwork_domain::UserId;

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Unique login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Home tenant.
    pub tenant_id: TenantId,
}

/// Input for user creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Password hash produced by a [`crate::PasswordHasher`].
    pub password_hash: String,
    /// Home tenant.
    pub tenant_id: TenantId,
}

/// Role bound to a user inside a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserRoleBinding {
    /// Bound user.
    pub user_id: UserId,
    /// Bound role slug.
    pub role_slug: String,
    /// Tenant the binding applies to.
    pub tenant_id: TenantId,
}

/// Persisted employee profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    /// Stable employee identifier.
    pub employee_id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// Employing tenant.
    pub tenant_id: TenantId,
    /// Tenant-unique employee number.
    pub employee_number: String,
    /// Organization code of the department.
    pub department: Option<String>,
    /// Job title.
    pub position: String,
    /// Manager's user identifier.
    pub manager_id: Option<UserId>,
}

/// Input for employee creation. Managers are attached afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    /// Owning user.
    pub user_id: UserId,
    /// Employing tenant.
    pub tenant_id: TenantId,
    /// Tenant-unique employee number.
    pub employee_number: String,
    /// Organization code of the department.
    pub department: Option<String>,
    /// Job title.
    pub position: String,
}

/// Repository port for users, their role bindings and employee profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Counts all users.
    async fn count_users(&self) -> AppResult<u64>;

    /// Finds a user by username.
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Creates a user. Fails with a conflict when the username is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Lists all users ordered by username.
    async fn list_users(&self) -> AppResult<Vec<UserRecord>>;

    /// Binds a role to a user. Binding an existing pair is a no-op.
    async fn bind_role(&self, binding: UserRoleBinding) -> AppResult<()>;

    /// Lists role bindings, optionally restricted to one user.
    async fn list_role_bindings(&self, user_id: Option<UserId>)
    -> AppResult<Vec<UserRoleBinding>>;

    /// Finds the employee profile of a user.
    async fn find_employee_by_user(&self, user_id: UserId) -> AppResult<Option<EmployeeRecord>>;

    /// Creates an employee profile.
    async fn create_employee(&self, employee: NewEmployee) -> AppResult<EmployeeRecord>;

    /// Lists all employee profiles.
    async fn list_employees(&self) -> AppResult<Vec<EmployeeRecord>>;

    /// Sets the manager of an employee.
    async fn set_employee_manager(&self, employee_id: Uuid, manager_id: UserId) -> AppResult<()>;
}
