use std::sync::Arc;

use groundwork_application::{DataLoader, SeedCatalog, SeedSource};
use groundwork_domain::{
    DictionaryTemplate, MenuTemplate, Mode, OptionTemplate, OrganizationTemplate,
    PermissionTemplate, RolePermissionMapping, RoleTemplate, TenantTemplate, UserTemplate,
};

mod company;
mod enterprise;
mod templates;
mod website;

/// Seed catalogs shipped with the service, one per mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltinSeedLoader {
    /// Single-tenant site with editorial roles.
    Website(SeedCatalog),
    /// Single company with departments and a management chain.
    Company(SeedCatalog),
    /// Group headquarters with subsidiary tenants.
    Enterprise(SeedCatalog),
}

impl BuiltinSeedLoader {
    /// Builds the catalog for a mode.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Website => Self::Website(website::catalog()),
            Mode::Company => Self::Company(company::catalog()),
            Mode::Enterprise => Self::Enterprise(enterprise::catalog()),
        }
    }

    /// Returns the underlying catalog.
    #[must_use]
    pub fn catalog(&self) -> &SeedCatalog {
        match self {
            Self::Website(catalog) | Self::Company(catalog) | Self::Enterprise(catalog) => catalog,
        }
    }
}

impl DataLoader for BuiltinSeedLoader {
    fn roles(&self) -> &[RoleTemplate] {
        self.catalog().roles()
    }

    fn permissions(&self) -> &[PermissionTemplate] {
        self.catalog().permissions()
    }

    fn role_permissions(&self) -> &RolePermissionMapping {
        self.catalog().role_permissions()
    }

    fn policy_rules(&self) -> &[Vec<String>] {
        self.catalog().policy_rules()
    }

    fn inheritance_rules(&self) -> &[Vec<String>] {
        self.catalog().inheritance_rules()
    }

    fn users(&self) -> &[UserTemplate] {
        self.catalog().users()
    }

    fn tenants(&self) -> &[TenantTemplate] {
        self.catalog().tenants()
    }

    fn menus(&self) -> &[MenuTemplate] {
        self.catalog().menus()
    }

    fn options(&self) -> &[OptionTemplate] {
        self.catalog().options()
    }

    fn dictionaries(&self) -> &[DictionaryTemplate] {
        self.catalog().dictionaries()
    }

    fn organizations(&self) -> &[OrganizationTemplate] {
        self.catalog().organizations()
    }
}

/// Serves the built-in catalogs, built once.
#[derive(Debug, Clone)]
pub struct BuiltinSeedSource {
    website: Arc<BuiltinSeedLoader>,
    company: Arc<BuiltinSeedLoader>,
    enterprise: Arc<BuiltinSeedLoader>,
}

impl BuiltinSeedSource {
    /// Builds every built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            website: Arc::new(BuiltinSeedLoader::for_mode(Mode::Website)),
            company: Arc::new(BuiltinSeedLoader::for_mode(Mode::Company)),
            enterprise: Arc::new(BuiltinSeedLoader::for_mode(Mode::Enterprise)),
        }
    }
}

impl Default for BuiltinSeedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedSource for BuiltinSeedSource {
    fn loader(&self, mode: Mode) -> Arc<dyn DataLoader> {
        match mode {
            Mode::Website => self.website.clone(),
            Mode::Company => self.company.clone(),
            Mode::Enterprise => self.enterprise.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use groundwork_application::{DataLoader, validate_catalog};
    use groundwork_domain::Mode;

    use super::BuiltinSeedLoader;

    #[test]
    fn unknown_mode_selects_website_catalog() {
        let loader = BuiltinSeedLoader::for_mode(Mode::from_transport("unknown"));

        assert_eq!(loader, BuiltinSeedLoader::for_mode(Mode::Website));
    }

    #[test]
    fn builtin_catalogs_are_consistent() {
        for mode in Mode::all() {
            let loader = BuiltinSeedLoader::for_mode(*mode);
            let report = validate_catalog(&loader);
            assert!(report.is_clean(), "{mode:?}: {:?}", report.issues());
        }
    }

    #[test]
    fn every_catalog_declares_its_default_tenant() {
        for mode in Mode::all() {
            let loader = BuiltinSeedLoader::for_mode(*mode);
            let default_slug = mode.profile().default_tenant_slug();
            assert!(
                loader
                    .tenants()
                    .iter()
                    .any(|tenant| tenant.slug == default_slug)
            );
        }
    }

    #[test]
    fn every_catalog_seeds_an_admin_candidate() {
        for mode in Mode::all() {
            let loader = BuiltinSeedLoader::for_mode(*mode);
            let candidates = mode.profile().admin_candidate_usernames();
            assert!(
                loader
                    .users()
                    .iter()
                    .any(|user| candidates.contains(&user.username.as_str()))
            );
        }
    }

    #[test]
    fn company_catalog_grants_employee_management_to_department_managers() {
        let loader = BuiltinSeedLoader::for_mode(Mode::Company);

        assert!(loader.roles().iter().any(|role| role.slug == "company-admin"));
        assert!(
            loader
                .role_permissions()
                .permissions_for("department-manager")
                .is_some_and(|names| names.contains("Employee Management"))
        );
    }
}
