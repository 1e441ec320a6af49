use std::sync::Arc;

use serde::{Deserialize, Serialize};

use groundwork_domain::{
    DictionaryTemplate, MenuTemplate, Mode, OptionTemplate, OrganizationTemplate,
    PermissionTemplate, RolePermissionMapping, RoleTemplate, TenantTemplate, UserTemplate,
};

/// Read-only seed catalog for one deployment mode.
///
/// Policy and inheritance rules are raw rows; their arity is checked by the
/// policy compiler, not by the loader.
pub trait DataLoader: Send + Sync {
    /// Role templates.
    fn roles(&self) -> &[RoleTemplate];

    /// Permission templates.
    fn permissions(&self) -> &[PermissionTemplate];

    /// Role slug to permission-name assignments.
    fn role_permissions(&self) -> &RolePermissionMapping;

    /// Literal `p` rows of 4 to 6 fields.
    fn policy_rules(&self) -> &[Vec<String>];

    /// Literal `g` rows of exactly 3 fields.
    fn inheritance_rules(&self) -> &[Vec<String>];

    /// User templates.
    fn users(&self) -> &[UserTemplate];

    /// Tenant templates.
    fn tenants(&self) -> &[TenantTemplate];

    /// Menu templates across all tiers.
    fn menus(&self) -> &[MenuTemplate];

    /// Option templates for the default tenant.
    fn options(&self) -> &[OptionTemplate];

    /// Dictionary templates.
    fn dictionaries(&self) -> &[DictionaryTemplate];

    /// Organization trees.
    fn organizations(&self) -> &[OrganizationTemplate];
}

/// Selects the seed catalog for a mode. Selection must be total over [`Mode`].
pub trait SeedSource: Send + Sync {
    /// Returns the loader for a mode.
    fn loader(&self, mode: Mode) -> Arc<dyn DataLoader>;
}

/// Plain-data seed catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedCatalog {
    /// Role templates.
    pub roles: Vec<RoleTemplate>,
    /// Permission templates.
    pub permissions: Vec<PermissionTemplate>,
    /// Role slug to permission-name assignments.
    pub role_permissions: RolePermissionMapping,
    /// Literal `p` rows.
    pub policy_rules: Vec<Vec<String>>,
    /// Literal `g` rows.
    pub inheritance_rules: Vec<Vec<String>>,
    /// User templates.
    pub users: Vec<UserTemplate>,
    /// Tenant templates.
    pub tenants: Vec<TenantTemplate>,
    /// Menu templates.
    pub menus: Vec<MenuTemplate>,
    /// Option templates.
    pub options: Vec<OptionTemplate>,
    /// Dictionary templates.
    pub dictionaries: Vec<DictionaryTemplate>,
    /// Organization trees.
    pub organizations: Vec<OrganizationTemplate>,
}

impl DataLoader for SeedCatalog {
    fn roles(&self) -> &[RoleTemplate] {
        &self.roles
    }

    fn permissions(&self) -> &[PermissionTemplate] {
        &self.permissions
    }

    fn role_permissions(&self) -> &RolePermissionMapping {
        &self.role_permissions
    }

    fn policy_rules(&self) -> &[Vec<String>] {
        &self.policy_rules
    }

    fn inheritance_rules(&self) -> &[Vec<String>] {
        &self.inheritance_rules
    }

    fn users(&self) -> &[UserTemplate] {
        &self.users
    }

    fn tenants(&self) -> &[TenantTemplate] {
        &self.tenants
    }

    fn menus(&self) -> &[MenuTemplate] {
        &self.menus
    }

    fn options(&self) -> &[OptionTemplate] {
        &self.options
    }

    fn dictionaries(&self) -> &[DictionaryTemplate] {
        &self.dictionaries
    }

    fn organizations(&self) -> &[OrganizationTemplate] {
        &self.organizations
    }
}

/// A single catalog serves every mode.
impl SeedSource for SeedCatalog {
    fn loader(&self, _mode: Mode) -> Arc<dyn DataLoader> {
        Arc::new(self.clone())
    }
}
