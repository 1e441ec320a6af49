mod data_loader;
mod dictionaries;
mod menus;
mod options;
mod organizations;
mod passwords;
mod permissions;
mod policies;
mod repositories;
mod roles;
mod tenants;
mod users;

pub use data_loader::{DataLoader, SeedCatalog, SeedSource};
pub use dictionaries::{DictionaryRecord, DictionaryRepository, NewDictionary};
pub use menus::{MenuRecord, MenuRepository, NewMenu};
pub use options::{OptionRecord, OptionRepository};
pub use organizations::{NewOrganization, OrganizationRecord, OrganizationRepository};
pub use passwords::PasswordHasher;
pub use permissions::{NewPermission, PermissionRecord, PermissionRepository};
pub use policies::{PolicyFilter, PolicyRecord, PolicyRepository};
pub use repositories::BootstrapRepositories;
pub use roles::{NewRole, RoleRecord, RoleRepository};
pub use tenants::{NewTenant, TenantRecord, TenantRepository};
pub use users::{
    EmployeeRecord, NewEmployee, NewUser, UserRecord, UserRepository, UserRoleBinding,
};
