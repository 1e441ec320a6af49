//! Application services and ports.

#![forbid(unsafe_code)]

mod bootstrap_ports;
mod bootstrap_service;

pub use bootstrap_ports::{
    BootstrapRepositories, DataLoader, DictionaryRecord, DictionaryRepository, EmployeeRecord,
    MenuRecord, MenuRepository, NewDictionary, NewEmployee, NewMenu, NewOrganization,
    NewPermission, NewRole, NewTenant, NewUser, OptionRecord, OptionRepository,
    OrganizationRecord, OrganizationRepository, PasswordHasher, PermissionRecord,
    PermissionRepository, PolicyFilter, PolicyRecord, PolicyRepository, RoleRecord,
    RoleRepository, SeedCatalog, SeedSource, TenantRecord, TenantRepository, UserRecord,
    UserRepository, UserRoleBinding,
};
pub use bootstrap_service::{
    BOOTSTRAP_VERSION, BootstrapConfig, BootstrapContext, BootstrapError, BootstrapService,
    PolicyCompilationReport, StateBackup, ValidationIssue, ValidationIssueKind,
    ValidationReport, validate_catalog,
};
