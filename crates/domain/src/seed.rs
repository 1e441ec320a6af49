//! Seed templates describing what a bootstrap run provisions.
//!
//! Templates are plain data. They reference each other by natural key
//! (role slug, permission name, username, tenant slug, menu slug) and never
//! by storage identifier, so one catalog can be replayed against any store.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use groundwork_core::AppError;
use serde::{Deserialize, Serialize};

/// Role seed row. `slug` is the identity every other template references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTemplate {
    /// Display name.
    pub name: String,
    /// Unique role key.
    pub slug: String,
    /// Whether the role starts disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Permission seed row. `name` is only a lookup key; the grant itself is the
/// `(action, subject)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTemplate {
    /// Unique permission key.
    pub name: String,
    /// Granted action, for example `manage`, `read` or `*`.
    pub action: String,
    /// Resource subject, for example `user`, `employee` or `*`.
    pub subject: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Disabled permissions are provisioned but never compiled into policies.
    #[serde(default)]
    pub disabled: bool,
}

/// Role slug to permission-name assignments declared by a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolePermissionMapping(BTreeMap<String, BTreeSet<String>>);

impl RolePermissionMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from `(role_slug, permission_names)` pairs.
    #[must_use]
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a [&'a str])>,
    ) -> Self {
        let mut mapping = Self::new();
        for (role_slug, permission_names) in entries {
            for permission_name in permission_names {
                mapping.grant(role_slug, permission_name);
            }
        }
        mapping
    }

    /// Adds one permission name to a role.
    pub fn grant(&mut self, role_slug: &str, permission_name: &str) {
        self.0
            .entry(role_slug.to_owned())
            .or_default()
            .insert(permission_name.to_owned());
    }

    /// Returns the permission names assigned to a role.
    #[must_use]
    pub fn permissions_for(&self, role_slug: &str) -> Option<&BTreeSet<String>> {
        self.0.get(role_slug)
    }

    /// Iterates role slugs with their permission names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0
            .iter()
            .map(|(role_slug, names)| (role_slug.as_str(), names))
    }

    /// Returns the total number of role-permission pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    /// Returns whether no assignments are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Employee profile attached to a seeded user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTemplate {
    /// Tenant-unique employee number.
    pub employee_number: String,
    /// Organization code of the employee's department.
    #[serde(default)]
    pub department: Option<String>,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Username of the manager, resolved after every user exists.
    #[serde(default)]
    pub manager: Option<String>,
}

/// User seed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTemplate {
    /// Unique login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Plaintext seed password, hashed before persistence.
    pub password: String,
    /// Role slugs bound to the user inside its tenant.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Tenant slug; the mode's default tenant when absent.
    #[serde(default)]
    pub tenant_slug: Option<String>,
    /// Employee profile, when the user is staff.
    #[serde(default)]
    pub employee: Option<EmployeeTemplate>,
}

/// Tenant (or space) seed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantTemplate {
    /// Unique tenant key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Parent tenant slug for enterprise hierarchies.
    #[serde(default)]
    pub parent_slug: Option<String>,
}

/// Navigation tier of a menu entry. Tiers are provisioned in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuTier {
    /// Top navigation header.
    Header,
    /// Sidebar group below a header.
    Sidebar,
    /// Leaf entry below a sidebar group.
    Submenu,
}

impl MenuTier {
    /// Returns all tiers in provisioning order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[MenuTier] = &[MenuTier::Header, MenuTier::Sidebar, MenuTier::Submenu];

        ALL
    }

    /// Returns a stable storage value for this tier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Sidebar => "sidebar",
            Self::Submenu => "submenu",
        }
    }
}

impl FromStr for MenuTier {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|tier| tier.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown menu tier '{value}'")))
    }
}

/// Menu seed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTemplate {
    /// Unique menu key.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Route path.
    #[serde(default)]
    pub path: String,
    /// Navigation tier.
    pub tier: MenuTier,
    /// Parent menu slug; required for sidebars and submenus.
    #[serde(default)]
    pub parent_slug: Option<String>,
    /// Permission name required to see the entry.
    #[serde(default)]
    pub permission: Option<String>,
    /// Sort position among siblings.
    #[serde(default)]
    pub sort_order: i32,
}

/// Option seed row, stored in the default tenant scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTemplate {
    /// Unique option key inside the tenant scope.
    pub key: String,
    /// Serialized option value.
    pub value: String,
}

/// Dictionary entry seed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryItemTemplate {
    /// Display label.
    pub label: String,
    /// Stored value.
    pub value: String,
    /// Sort position.
    #[serde(default)]
    pub sort_order: i32,
}

/// Dictionary seed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryTemplate {
    /// Unique dictionary code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Entries.
    #[serde(default)]
    pub items: Vec<DictionaryItemTemplate>,
}

/// Kind of organizational unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationKind {
    /// Legal entity.
    Company,
    /// Business division.
    Division,
    /// Department.
    Department,
    /// Team.
    Team,
}

impl OrganizationKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Division => "division",
            Self::Department => "department",
            Self::Team => "team",
        }
    }
}

impl FromStr for OrganizationKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "company" => Ok(Self::Company),
            "division" => Ok(Self::Division),
            "department" => Ok(Self::Department),
            "team" => Ok(Self::Team),
            _ => Err(AppError::Validation(format!(
                "unknown organization kind '{value}'"
            ))),
        }
    }
}

/// Organizational unit seed node. Roots may target a tenant; children inherit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationTemplate {
    /// Tenant-unique organization code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Unit kind.
    pub kind: OrganizationKind,
    /// Tenant slug for root nodes; the mode's default tenant when absent.
    #[serde(default)]
    pub tenant_slug: Option<String>,
    /// Username of the unit leader.
    #[serde(default)]
    pub leader: Option<String>,
    /// Child units.
    #[serde(default)]
    pub children: Vec<OrganizationTemplate>,
}

impl OrganizationTemplate {
    /// Returns the number of nodes in this subtree, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OrganizationTemplate::node_count)
            .sum::<usize>()
    }
}
