use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use groundwork_core::{AppError, AppResult, TenantId};
use groundwork_domain::{
    BootstrapStep, DictionaryItemTemplate, DictionaryTemplate, EmployeeTemplate, MenuTemplate,
    MenuTier, Mode, ORCHESTRATOR_COMPONENT, OptionTemplate, OrganizationKind,
    OrganizationTemplate, PermissionTemplate, PolicyTuple, RolePermissionMapping, RoleTemplate,
    RunPhase, RunState, StepOutcome, TenantTemplate, UserId, UserTemplate,
};

use crate::bootstrap_ports::{
    BootstrapRepositories, DictionaryRecord, DictionaryRepository, EmployeeRecord, MenuRecord,
    MenuRepository, NewDictionary, NewEmployee, NewMenu, NewOrganization, NewPermission, NewRole,
    NewTenant, NewUser, OptionRecord, OptionRepository, OrganizationRecord,
    OrganizationRepository, PasswordHasher, PermissionRecord, PermissionRepository, PolicyFilter,
    PolicyRecord, PolicyRepository, RoleRecord, RoleRepository, SeedCatalog, TenantRecord,
    TenantRepository, UserRecord, UserRepository, UserRoleBinding,
};

use super::{BootstrapConfig, BootstrapError, BootstrapService};

#[derive(Default)]
struct FakeData {
    roles: Vec<RoleRecord>,
    role_links: Vec<(Uuid, Uuid)>,
    permissions: Vec<PermissionRecord>,
    tenants: Vec<TenantRecord>,
    users: Vec<UserRecord>,
    bindings: Vec<UserRoleBinding>,
    employees: Vec<EmployeeRecord>,
    menus: Vec<MenuRecord>,
    options: Vec<OptionRecord>,
    dictionaries: Vec<DictionaryRecord>,
    organizations: Vec<OrganizationRecord>,
    policies: Vec<PolicyRecord>,
}

#[derive(Default)]
struct FakeBootstrapStore {
    data: Mutex<FakeData>,
    failing_menus: bool,
    failing_role_listing: bool,
}

impl FakeBootstrapStore {
    fn failing_menus() -> Self {
        Self {
            failing_menus: true,
            ..Self::default()
        }
    }

    fn failing_role_listing() -> Self {
        Self {
            failing_role_listing: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl RoleRepository for FakeBootstrapStore {
    async fn count_roles(&self) -> AppResult<u64> {
        Ok(self.data.lock().await.roles.len() as u64)
    }

    async fn find_role_by_slug(&self, slug: &str) -> AppResult<Option<RoleRecord>> {
        let data = self.data.lock().await;
        Ok(data.roles.iter().find(|role| role.slug == slug).cloned())
    }

    async fn create_role(&self, role: NewRole) -> AppResult<RoleRecord> {
        let record = RoleRecord {
            role_id: Uuid::new_v4(),
            slug: role.slug,
            name: role.name,
            disabled: role.disabled,
            description: role.description,
        };
        self.data.lock().await.roles.push(record.clone());
        Ok(record)
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        if self.failing_role_listing {
            return Err(AppError::Internal("role listing is unavailable".to_owned()));
        }

        Ok(self.data.lock().await.roles.clone())
    }

    async fn list_role_permissions(&self, role_id: Uuid) -> AppResult<Vec<PermissionRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .role_links
            .iter()
            .filter(|(linked_role, _)| *linked_role == role_id)
            .filter_map(|(_, permission_id)| {
                data.permissions
                    .iter()
                    .find(|permission| permission.permission_id == *permission_id)
                    .cloned()
            })
            .collect())
    }

    async fn assign_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<()> {
        self.data
            .lock()
            .await
            .role_links
            .push((role_id, permission_id));
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for FakeBootstrapStore {
    async fn count_permissions(&self) -> AppResult<u64> {
        Ok(self.data.lock().await.permissions.len() as u64)
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .permissions
            .iter()
            .find(|permission| permission.name == name)
            .cloned())
    }

    async fn create_permission(&self, permission: NewPermission) -> AppResult<PermissionRecord> {
        let record = PermissionRecord {
            permission_id: Uuid::new_v4(),
            name: permission.name,
            action: permission.action,
            subject: permission.subject,
            description: permission.description,
            disabled: permission.disabled,
        };
        self.data.lock().await.permissions.push(record.clone());
        Ok(record)
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        Ok(self.data.lock().await.permissions.clone())
    }
}

#[async_trait]
impl TenantRepository for FakeBootstrapStore {
    async fn count_tenants(&self) -> AppResult<u64> {
        Ok(self.data.lock().await.tenants.len() as u64)
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> AppResult<Option<TenantRecord>> {
        let data = self.data.lock().await;
        Ok(data.tenants.iter().find(|tenant| tenant.slug == slug).cloned())
    }

    async fn create_tenant(&self, tenant: NewTenant) -> AppResult<TenantRecord> {
        let record = TenantRecord {
            tenant_id: TenantId::new(),
            slug: tenant.slug,
            name: tenant.name,
            description: tenant.description,
            parent_id: tenant.parent_id,
        };
        self.data.lock().await.tenants.push(record.clone());
        Ok(record)
    }

    async fn list_tenants(&self) -> AppResult<Vec<TenantRecord>> {
        Ok(self.data.lock().await.tenants.clone())
    }
}

#[async_trait]
impl UserRepository for FakeBootstrapStore {
    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.data.lock().await.users.len() as u64)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let record = UserRecord {
            user_id: UserId::new(),
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            tenant_id: user.tenant_id,
        };
        self.data.lock().await.users.push(record.clone());
        Ok(record)
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.data.lock().await.users.clone())
    }

    async fn bind_role(&self, binding: UserRoleBinding) -> AppResult<()> {
        let mut data = self.data.lock().await;
        if !data.bindings.contains(&binding) {
            data.bindings.push(binding);
        }
        Ok(())
    }

    async fn list_role_bindings(
        &self,
        user_id: Option<UserId>,
    ) -> AppResult<Vec<UserRoleBinding>> {
        let data = self.data.lock().await;
        Ok(data
            .bindings
            .iter()
            .filter(|binding| user_id.is_none_or(|user_id| binding.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn find_employee_by_user(&self, user_id: UserId) -> AppResult<Option<EmployeeRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .employees
            .iter()
            .find(|employee| employee.user_id == user_id)
            .cloned())
    }

    async fn create_employee(&self, employee: NewEmployee) -> AppResult<EmployeeRecord> {
        let record = EmployeeRecord {
            employee_id: Uuid::new_v4(),
            user_id: employee.user_id,
            tenant_id: employee.tenant_id,
            employee_number: employee.employee_number,
            department: employee.department,
            position: employee.position,
            manager_id: None,
        };
        self.data.lock().await.employees.push(record.clone());
        Ok(record)
    }

    async fn list_employees(&self) -> AppResult<Vec<EmployeeRecord>> {
        Ok(self.data.lock().await.employees.clone())
    }

    async fn set_employee_manager(&self, employee_id: Uuid, manager_id: UserId) -> AppResult<()> {
        let mut data = self.data.lock().await;
        let employee = data
            .employees
            .iter_mut()
            .find(|employee| employee.employee_id == employee_id)
            .ok_or_else(|| AppError::NotFound("employee not found".to_owned()))?;
        employee.manager_id = Some(manager_id);
        Ok(())
    }
}

#[async_trait]
impl MenuRepository for FakeBootstrapStore {
    async fn count_menus(&self) -> AppResult<u64> {
        Ok(self.data.lock().await.menus.len() as u64)
    }

    async fn find_menu_by_slug(&self, slug: &str) -> AppResult<Option<MenuRecord>> {
        let data = self.data.lock().await;
        Ok(data.menus.iter().find(|menu| menu.slug == slug).cloned())
    }

    async fn create_menu(&self, menu: NewMenu) -> AppResult<MenuRecord> {
        if self.failing_menus {
            return Err(AppError::Internal("menu table is unavailable".to_owned()));
        }

        let record = MenuRecord {
            menu_id: Uuid::new_v4(),
            slug: menu.slug,
            title: menu.title,
            path: menu.path,
            tier: menu.tier,
            parent_id: menu.parent_id,
            permission: menu.permission,
            sort_order: menu.sort_order,
        };
        self.data.lock().await.menus.push(record.clone());
        Ok(record)
    }

    async fn list_menus(&self) -> AppResult<Vec<MenuRecord>> {
        Ok(self.data.lock().await.menus.clone())
    }
}

#[async_trait]
impl OptionRepository for FakeBootstrapStore {
    async fn count_options(&self, tenant_id: Option<TenantId>) -> AppResult<u64> {
        let data = self.data.lock().await;
        Ok(data
            .options
            .iter()
            .filter(|option| option.tenant_id == tenant_id)
            .count() as u64)
    }

    async fn find_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
    ) -> AppResult<Option<OptionRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .options
            .iter()
            .find(|option| option.tenant_id == tenant_id && option.key == key)
            .cloned())
    }

    async fn create_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
        value: &str,
    ) -> AppResult<OptionRecord> {
        self.upsert_option(tenant_id, key, value).await
    }

    async fn upsert_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
        value: &str,
    ) -> AppResult<OptionRecord> {
        let record = OptionRecord {
            tenant_id,
            key: key.to_owned(),
            value: value.to_owned(),
            updated_at: Utc::now(),
        };
        let mut data = self.data.lock().await;
        data.options
            .retain(|option| !(option.tenant_id == tenant_id && option.key == key));
        data.options.push(record.clone());
        Ok(record)
    }

    async fn list_options(
        &self,
        tenant_id: Option<TenantId>,
        prefix: &str,
    ) -> AppResult<Vec<OptionRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .options
            .iter()
            .filter(|option| option.tenant_id == tenant_id && option.key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DictionaryRepository for FakeBootstrapStore {
    async fn count_dictionaries(&self) -> AppResult<u64> {
        Ok(self.data.lock().await.dictionaries.len() as u64)
    }

    async fn find_dictionary_by_code(&self, code: &str) -> AppResult<Option<DictionaryRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .dictionaries
            .iter()
            .find(|dictionary| dictionary.code == code)
            .cloned())
    }

    async fn create_dictionary(&self, dictionary: NewDictionary) -> AppResult<DictionaryRecord> {
        let record = DictionaryRecord {
            dictionary_id: Uuid::new_v4(),
            code: dictionary.code,
            name: dictionary.name,
            description: dictionary.description,
            items: dictionary.items,
        };
        self.data.lock().await.dictionaries.push(record.clone());
        Ok(record)
    }

    async fn list_dictionaries(&self) -> AppResult<Vec<DictionaryRecord>> {
        Ok(self.data.lock().await.dictionaries.clone())
    }
}

#[async_trait]
impl OrganizationRepository for FakeBootstrapStore {
    async fn count_organizations(&self, tenant_id: TenantId) -> AppResult<u64> {
        let data = self.data.lock().await;
        Ok(data
            .organizations
            .iter()
            .filter(|organization| organization.tenant_id == tenant_id)
            .count() as u64)
    }

    async fn find_organization_by_code(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> AppResult<Option<OrganizationRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .organizations
            .iter()
            .find(|organization| organization.tenant_id == tenant_id && organization.code == code)
            .cloned())
    }

    async fn create_organization(
        &self,
        organization: NewOrganization,
    ) -> AppResult<OrganizationRecord> {
        let record = OrganizationRecord {
            organization_id: Uuid::new_v4(),
            tenant_id: organization.tenant_id,
            code: organization.code,
            name: organization.name,
            kind: organization.kind,
            parent_id: organization.parent_id,
            leader_id: organization.leader_id,
        };
        self.data.lock().await.organizations.push(record.clone());
        Ok(record)
    }

    async fn list_organizations(&self, tenant_id: TenantId) -> AppResult<Vec<OrganizationRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .organizations
            .iter()
            .filter(|organization| organization.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PolicyRepository for FakeBootstrapStore {
    async fn count_policies(&self, filter: &PolicyFilter) -> AppResult<u64> {
        let data = self.data.lock().await;
        Ok(data
            .policies
            .iter()
            .filter(|policy| filter.matches(&policy.tuple))
            .count() as u64)
    }

    async fn find_policy(&self, tuple: &PolicyTuple) -> AppResult<Option<PolicyRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .policies
            .iter()
            .find(|policy| &policy.tuple == tuple)
            .cloned())
    }

    async fn create_policy(&self, tuple: PolicyTuple) -> AppResult<PolicyRecord> {
        let record = PolicyRecord {
            policy_id: Uuid::new_v4(),
            tuple,
        };
        self.data.lock().await.policies.push(record.clone());
        Ok(record)
    }

    async fn list_policies(&self, filter: &PolicyFilter) -> AppResult<Vec<PolicyRecord>> {
        let data = self.data.lock().await;
        Ok(data
            .policies
            .iter()
            .filter(|policy| filter.matches(&policy.tuple))
            .cloned()
            .collect())
    }
}

struct PrefixPasswordHasher;

impl PasswordHasher for PrefixPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn user(username: &str, roles: &[&str], employee: Option<EmployeeTemplate>) -> UserTemplate {
    UserTemplate {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        display_name: username.to_owned(),
        password: "secret".to_owned(),
        roles: roles.iter().map(|role| (*role).to_owned()).collect(),
        tenant_slug: None,
        employee,
    }
}

fn employee(number: &str, manager: Option<&str>) -> EmployeeTemplate {
    EmployeeTemplate {
        employee_number: number.to_owned(),
        department: None,
        position: "staff".to_owned(),
        manager: manager.map(str::to_owned),
    }
}

fn menu(slug: &str, tier: MenuTier, parent_slug: Option<&str>) -> MenuTemplate {
    MenuTemplate {
        slug: slug.to_owned(),
        title: slug.to_owned(),
        path: format!("/{slug}"),
        tier,
        parent_slug: parent_slug.map(str::to_owned),
        permission: None,
        sort_order: 0,
    }
}

fn website_catalog() -> SeedCatalog {
    SeedCatalog {
        roles: vec![
            RoleTemplate {
                name: "Administrator".to_owned(),
                slug: "admin".to_owned(),
                disabled: false,
                description: String::new(),
            },
            RoleTemplate {
                name: "Editor".to_owned(),
                slug: "editor".to_owned(),
                disabled: false,
                description: String::new(),
            },
        ],
        permissions: vec![
            PermissionTemplate {
                name: "System Manage".to_owned(),
                action: "manage".to_owned(),
                subject: "*".to_owned(),
                description: String::new(),
                disabled: false,
            },
            PermissionTemplate {
                name: "Post Read".to_owned(),
                action: "read".to_owned(),
                subject: "post".to_owned(),
                description: String::new(),
                disabled: false,
            },
            PermissionTemplate {
                name: "Post Write".to_owned(),
                action: "create".to_owned(),
                subject: "post".to_owned(),
                description: String::new(),
                disabled: false,
            },
        ],
        role_permissions: RolePermissionMapping::from_entries([
            ("admin", ["System Manage"].as_slice()),
            ("editor", ["Post Read", "Post Write"].as_slice()),
        ]),
        policy_rules: vec![row(&["*", "*", "/health", "GET"]), row(&["broken", "row"])],
        inheritance_rules: vec![row(&["admin", "editor", "*"])],
        users: vec![
            user("writer", &["editor"], Some(employee("E-002", Some("admin")))),
            user("admin", &["admin"], Some(employee("E-001", None))),
        ],
        tenants: vec![TenantTemplate {
            slug: "main-site".to_owned(),
            name: "Main Site".to_owned(),
            description: String::new(),
            parent_slug: None,
        }],
        menus: vec![
            menu("content", MenuTier::Header, None),
            menu("posts", MenuTier::Sidebar, Some("content")),
            menu("orphan", MenuTier::Submenu, Some("missing")),
        ],
        options: vec![OptionTemplate {
            key: "site.title".to_owned(),
            value: "Groundwork".to_owned(),
        }],
        dictionaries: vec![DictionaryTemplate {
            code: "post_status".to_owned(),
            name: "Post status".to_owned(),
            description: String::new(),
            items: vec![DictionaryItemTemplate {
                label: "Draft".to_owned(),
                value: "draft".to_owned(),
                sort_order: 1,
            }],
        }],
        organizations: vec![OrganizationTemplate {
            code: "hq".to_owned(),
            name: "Headquarters".to_owned(),
            kind: OrganizationKind::Company,
            tenant_slug: None,
            leader: None,
            children: vec![OrganizationTemplate {
                code: "editorial".to_owned(),
                name: "Editorial".to_owned(),
                kind: OrganizationKind::Department,
                tenant_slug: None,
                leader: Some("writer".to_owned()),
                children: Vec::new(),
            }],
        }],
    }
}

fn service_with(
    store: Arc<FakeBootstrapStore>,
    catalog: SeedCatalog,
    config: BootstrapConfig,
) -> BootstrapService {
    BootstrapService::new(
        BootstrapRepositories::from_store(store),
        Arc::new(catalog),
        Arc::new(PrefixPasswordHasher),
        config,
    )
}

fn service(store: Arc<FakeBootstrapStore>) -> BootstrapService {
    service_with(store, website_catalog(), BootstrapConfig::default())
}

fn components(state: &RunState) -> Vec<&str> {
    state
        .statuses
        .iter()
        .map(|status| status.component.as_str())
        .collect()
}

#[tokio::test]
async fn execute_runs_every_step_in_order() {
    let store = Arc::new(FakeBootstrapStore::default());
    let state = service(store.clone()).execute(false).await;

    let Ok(state) = state else {
        panic!("bootstrap should succeed");
    };
    let expected: Vec<&str> = BootstrapStep::PIPELINE
        .iter()
        .map(BootstrapStep::component)
        .collect();
    assert_eq!(components(&state), expected);
    assert!(state.is_initialized);
    assert_eq!(state.phase, RunPhase::Initialized);
    assert!(state.last_run_time.is_some());

    let data = store.data.lock().await;
    assert_eq!(data.roles.len(), 2);
    assert_eq!(data.role_links.len(), 3);
    assert_eq!(data.users.len(), 2);
    assert_eq!(data.bindings.len(), 2);
    assert_eq!(data.menus.len(), 2);
    assert_eq!(data.dictionaries.len(), 1);
    assert_eq!(data.organizations.len(), 2);
    assert!(
        data.users
            .iter()
            .all(|user| !user.email.is_empty() && user.tenant_id == data.tenants[0].tenant_id)
    );
}

#[tokio::test]
async fn policies_compile_every_pass_and_skip_malformed_rows() {
    let store = Arc::new(FakeBootstrapStore::default());
    assert!(service(store.clone()).execute(false).await.is_ok());

    let data = store.data.lock().await;
    let domain = data.tenants[0].tenant_id.to_string();
    let tuples: Vec<&PolicyTuple> = data.policies.iter().map(|policy| &policy.tuple).collect();

    assert!(tuples.contains(&&PolicyTuple::policy("admin", domain.as_str(), "*", "*")));
    assert!(tuples.contains(&&PolicyTuple::policy(
        "editor",
        domain.as_str(),
        "/content/posts",
        "GET"
    )));
    assert!(tuples.contains(&&PolicyTuple::policy(
        "editor",
        domain.as_str(),
        "/content/posts",
        "POST"
    )));
    assert!(tuples.contains(&&PolicyTuple::policy("*", "*", "/health", "GET")));
    assert!(tuples.contains(&&PolicyTuple::grouping("admin", "editor", "*")));
    assert!(tuples.iter().all(|tuple| tuple.v0 != "broken"));
    // 3 dynamic, 1 static, 1 inheritance, 2 user bindings.
    assert_eq!(tuples.len(), 7);
}

#[tokio::test]
async fn managers_resolve_forward_references() {
    let store = Arc::new(FakeBootstrapStore::default());
    assert!(service(store.clone()).execute(false).await.is_ok());

    let data = store.data.lock().await;
    let admin = data.users.iter().find(|user| user.username == "admin");
    let writer = data.users.iter().find(|user| user.username == "writer");
    let (Some(admin), Some(writer)) = (admin, writer) else {
        panic!("seeded users should exist");
    };

    let writer_employee = data
        .employees
        .iter()
        .find(|employee| employee.user_id == writer.user_id);
    assert_eq!(
        writer_employee.and_then(|employee| employee.manager_id),
        Some(admin.user_id)
    );

    let headquarters = data
        .organizations
        .iter()
        .find(|organization| organization.code == "hq");
    let editorial = data
        .organizations
        .iter()
        .find(|organization| organization.code == "editorial");
    assert_eq!(
        headquarters.and_then(|organization| organization.leader_id),
        Some(admin.user_id)
    );
    assert_eq!(
        editorial.and_then(|organization| organization.leader_id),
        Some(writer.user_id)
    );
    assert_eq!(
        editorial.and_then(|organization| organization.parent_id),
        headquarters.map(|organization| organization.organization_id)
    );
}

#[tokio::test]
async fn initialized_state_rejects_execute_without_reinit() {
    let store = Arc::new(FakeBootstrapStore::default());
    let service = service_with(
        store,
        website_catalog(),
        BootstrapConfig {
            allow_reinitialization: false,
            ..BootstrapConfig::default()
        },
    );
    assert!(service.execute(false).await.is_ok());

    let without_flag = service.execute(false).await;
    let without_permission = service.execute(true).await;

    assert!(matches!(
        without_flag,
        Err(BootstrapError::Rejected(AppError::AlreadyInitialized(_)))
    ));
    assert!(matches!(
        without_permission,
        Err(BootstrapError::Rejected(AppError::AlreadyInitialized(_)))
    ));
}

#[tokio::test]
async fn reinitialization_is_idempotent() {
    let store = Arc::new(FakeBootstrapStore::default());
    let service = service_with(
        store.clone(),
        website_catalog(),
        BootstrapConfig {
            allow_reinitialization: true,
            ..BootstrapConfig::default()
        },
    );
    assert!(service.execute(false).await.is_ok());
    let counts = |data: &FakeData| {
        (
            data.roles.len(),
            data.role_links.len(),
            data.users.len(),
            data.bindings.len(),
            data.employees.len(),
            data.menus.len(),
            data.organizations.len(),
            data.policies.len(),
        )
    };
    let first = counts(&*store.data.lock().await);

    let rerun = service.execute(true).await;
    assert!(rerun.is_ok_and(|state| state.phase == RunPhase::Initialized));
    assert_eq!(counts(&*store.data.lock().await), first);

    let backups = service.list_backups().await;
    assert!(backups.is_ok_and(|backups| backups.len() == 1));
}

#[tokio::test]
async fn failing_step_stops_the_pipeline() {
    let store = Arc::new(FakeBootstrapStore::failing_menus());
    let service = service(store.clone());

    let result = service.execute(false).await;

    let Err(BootstrapError::StepFailed {
        component,
        source,
        state,
    }) = result
    else {
        panic!("menus step should fail");
    };
    assert_eq!(component, "menus");
    assert!(matches!(source, AppError::CreationFailed(_)));
    assert_eq!(
        components(&state),
        vec!["roles", "permissions", "tenants", "users", "policies", "menus"]
    );
    assert_eq!(
        state.statuses.last().map(|status| status.status),
        Some(StepOutcome::Failed)
    );
    assert_eq!(state.phase, RunPhase::Failed);
    assert!(!state.is_initialized);

    let data = store.data.lock().await;
    assert!(data.dictionaries.is_empty());
    assert!(data.organizations.is_empty());
    assert!(data.options.iter().all(|option| option.tenant_id.is_none()));
    drop(data);

    assert_eq!(service.state().await.ok(), Some(*state));
}

#[tokio::test]
async fn missing_default_tenant_fails_users_step() {
    let store = Arc::new(FakeBootstrapStore::default());
    let mut catalog = website_catalog();
    catalog.tenants.clear();
    let service = service_with(store, catalog, BootstrapConfig::default());

    let result = service.execute(false).await;

    assert!(matches!(
        result,
        Err(BootstrapError::StepFailed {
            ref component,
            source: AppError::DependencyMissing(_),
            ..
        }) if component == "users"
    ));
}

#[tokio::test]
async fn initialize_users_runs_dependencies_then_policies() {
    let store = Arc::new(FakeBootstrapStore::default());
    let state = service(store.clone()).initialize_users().await;

    let Ok(state) = state else {
        panic!("users slice should succeed");
    };
    assert_eq!(
        components(&state),
        vec!["roles", "permissions", "tenants", "users", "policies"]
    );
    assert_eq!(state.phase, RunPhase::Partial);
    assert!(!state.is_initialized);
    assert!(store.data.lock().await.menus.is_empty());
}

#[tokio::test]
async fn initialize_organizations_provisions_its_closure_then_policies() {
    let store = Arc::new(FakeBootstrapStore::default());
    let state = service(store.clone()).initialize_organizations().await;

    assert!(state.is_ok_and(|state| components(&state)
        == vec!["roles", "permissions", "tenants", "users", "organizations", "policies"]));

    let data = store.data.lock().await;
    assert_eq!(data.organizations.len(), 2);
    assert_eq!(data.bindings.len(), 2);
    for binding in &data.bindings {
        let expected = PolicyTuple::grouping(
            binding.user_id.to_string(),
            binding.role_slug.as_str(),
            binding.tenant_id.to_string(),
        );
        assert!(data.policies.iter().any(|policy| policy.tuple == expected));
    }
}

#[tokio::test]
async fn rerun_repairs_missing_links_without_new_rows() {
    let store = Arc::new(FakeBootstrapStore::default());
    let service = service_with(
        store.clone(),
        website_catalog(),
        BootstrapConfig {
            allow_reinitialization: true,
            ..BootstrapConfig::default()
        },
    );
    assert!(service.execute(false).await.is_ok());

    let writer_id = {
        let mut data = store.data.lock().await;
        let Some(writer_id) = data
            .users
            .iter()
            .find(|user| user.username == "writer")
            .map(|user| user.user_id)
        else {
            panic!("writer should exist");
        };
        data.role_links.clear();
        data.bindings.retain(|binding| binding.user_id != writer_id);
        for employee in &mut data.employees {
            employee.manager_id = None;
        }
        writer_id
    };
    let base_counts = |data: &FakeData| {
        (
            data.roles.len(),
            data.permissions.len(),
            data.users.len(),
            data.employees.len(),
        )
    };
    let before = base_counts(&*store.data.lock().await);

    assert!(service.execute(true).await.is_ok());

    let data = store.data.lock().await;
    assert_eq!(base_counts(&*data), before);
    assert_eq!(data.role_links.len(), 3);
    assert_eq!(data.bindings.len(), 2);
    assert!(
        data.bindings
            .iter()
            .any(|binding| binding.user_id == writer_id && binding.role_slug == "editor")
    );
    let admin_id = data
        .users
        .iter()
        .find(|user| user.username == "admin")
        .map(|user| user.user_id);
    let writer_manager = data
        .employees
        .iter()
        .find(|employee| employee.user_id == writer_id)
        .and_then(|employee| employee.manager_id);
    assert!(admin_id.is_some());
    assert_eq!(writer_manager, admin_id);
}

#[tokio::test]
async fn failing_policy_pass_does_not_stop_the_others() {
    let store = Arc::new(FakeBootstrapStore::failing_role_listing());
    let service = service(store.clone());

    let state = service.execute(false).await;

    let Ok(state) = state else {
        panic!("a failed policy pass should not fail the run");
    };
    assert!(state.is_initialized);
    assert!(state.statuses.iter().any(|status| status.component == "policies"
        && status.status == StepOutcome::Initialized));

    {
        let data = store.data.lock().await;
        let tuples: Vec<&PolicyTuple> = data.policies.iter().map(|policy| &policy.tuple).collect();
        assert!(tuples.contains(&&PolicyTuple::policy("*", "*", "/health", "GET")));
        assert!(tuples.contains(&&PolicyTuple::grouping("admin", "editor", "*")));
        assert!(tuples.iter().all(|tuple| tuple.v0 != "editor"));
        // 1 static, 1 inheritance, 2 user bindings.
        assert_eq!(tuples.len(), 4);
    }

    let report = service.compile_policies().await;
    let Ok(report) = report else {
        panic!("compilation should report instead of failing");
    };
    assert_eq!(report.failed_passes, vec!["dynamic"]);
    assert_eq!(report.dynamic_inserted, 0);
}

#[tokio::test]
async fn mode_is_pinned_once_bootstrap_ran() {
    let store = Arc::new(FakeBootstrapStore::default());
    let service = service(store.clone());

    let changed = service.set_mode(Mode::Company).await;
    assert!(changed.is_ok_and(|state| state.mode == Mode::Company));

    let reloaded = self::service(store).state().await;
    assert!(reloaded.is_ok_and(|state| state.mode == Mode::Company));

    let mut catalog = website_catalog();
    catalog.tenants[0].slug = "acme-corp".to_owned();
    let company_store = Arc::new(FakeBootstrapStore::default());
    let company = service_with(
        company_store,
        catalog,
        BootstrapConfig {
            initial_mode: Mode::Company,
            ..BootstrapConfig::default()
        },
    );
    assert!(company.execute(false).await.is_ok());
    assert!(matches!(
        company.set_mode(Mode::Enterprise).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn reset_requires_permission_and_keeps_rows() {
    let store = Arc::new(FakeBootstrapStore::default());
    let locked = service(store.clone());
    assert!(locked.execute(false).await.is_ok());
    assert!(matches!(
        locked.reset_initialization().await,
        Err(AppError::Forbidden(_))
    ));

    let service = service_with(
        store.clone(),
        website_catalog(),
        BootstrapConfig {
            allow_reset: true,
            ..BootstrapConfig::default()
        },
    );
    let reset = service.reset_initialization().await;
    assert!(reset.is_ok_and(|state| state.phase == RunPhase::NotInitialized
        && !state.is_initialized
        && state.statuses.is_empty()));
    assert_eq!(store.data.lock().await.users.len(), 2);

    let rerun = service.execute(false).await;
    assert!(rerun.is_ok_and(|state| state.is_initialized));
    assert_eq!(store.data.lock().await.users.len(), 2);
}

#[tokio::test]
async fn interrupted_run_is_reported_as_failed() {
    let store = Arc::new(FakeBootstrapStore::default());
    let mut stale = RunState::new(Mode::Website, "0.0.1");
    stale.begin_run(Mode::Website, "0.0.1");
    stale.record_success(BootstrapStep::Roles);
    let encoded = serde_json::to_string(&stale).unwrap_or_default();
    assert!(
        store
            .upsert_option(None, "bootstrap.state", &encoded)
            .await
            .is_ok()
    );

    let state = service(store.clone()).state().await;

    let Ok(state) = state else {
        panic!("state should load");
    };
    assert_eq!(state.phase, RunPhase::Failed);
    assert_eq!(
        state.first_failure().map(|status| status.component.as_str()),
        Some(ORCHESTRATOR_COMPONENT)
    );
    let persisted = store.find_option(None, "bootstrap.state").await;
    assert!(persisted.is_ok_and(|option| option
        .is_some_and(|option| option.value.contains("\"failed\""))));
}

#[tokio::test]
async fn backups_restore_a_previous_state() {
    let store = Arc::new(FakeBootstrapStore::default());
    let service = service_with(
        store,
        website_catalog(),
        BootstrapConfig {
            allow_reset: true,
            ..BootstrapConfig::default()
        },
    );
    assert!(matches!(
        service.create_backup().await,
        Err(AppError::NotInitialized(_))
    ));
    assert!(service.execute(false).await.is_ok());

    let Ok(backup) = service.create_backup().await else {
        panic!("backup should be stored");
    };
    assert!(service.reset_initialization().await.is_ok());

    let restored = service.restore_backup(&backup.key).await;
    assert!(restored.is_ok_and(|state| state.is_initialized
        && state.phase == RunPhase::Initialized));
    assert!(matches!(
        service.restore_backup("bootstrap.backup.1").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.restore_backup("bootstrap.state").await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn compile_policies_requires_a_prior_run() {
    let store = Arc::new(FakeBootstrapStore::default());
    let service = service(store);

    assert!(matches!(
        service.compile_policies().await,
        Err(AppError::NotInitialized(_))
    ));
    assert!(service.execute(false).await.is_ok());

    let report = service.compile_policies().await;
    assert!(report.is_ok_and(|report| report.total_inserted() == 0
        && report.malformed_rows == 1
        && report.failed_passes.is_empty()));
}
