use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use tracing::warn;

use groundwork_core::{AppError, AppResult};
use groundwork_domain::WILDCARD;

use crate::bootstrap_ports::DataLoader;

/// Category of a cross-reference problem in a seed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationIssueKind {
    /// A menu requires a permission the catalog does not declare.
    MenuPermission,
    /// A role-permission mapping names an undeclared permission.
    MappedPermission,
    /// A role-permission mapping names an undeclared role.
    MappedRole,
    /// A literal policy row's subject is neither a declared role nor `*`.
    PolicySubject,
    /// An inheritance row names a role that is neither declared nor `*`.
    InheritanceRole,
}

/// One dangling reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidationIssue {
    /// Category.
    pub kind: ValidationIssueKind,
    /// Item holding the reference.
    pub source: String,
    /// Name that did not resolve.
    pub reference: String,
}

impl Display for ValidationIssue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ValidationIssueKind::MenuPermission => write!(
                formatter,
                "menu '{}' requires unknown permission '{}'",
                self.source, self.reference
            ),
            ValidationIssueKind::MappedPermission => write!(
                formatter,
                "role '{}' is mapped to unknown permission '{}'",
                self.source, self.reference
            ),
            ValidationIssueKind::MappedRole => write!(
                formatter,
                "role-permission mapping names unknown role '{}'",
                self.reference
            ),
            ValidationIssueKind::PolicySubject => write!(
                formatter,
                "policy row {} names unknown role '{}'",
                self.source, self.reference
            ),
            ValidationIssueKind::InheritanceRole => write!(
                formatter,
                "inheritance row {} names unknown role '{}'",
                self.source, self.reference
            ),
        }
    }
}

/// Result of a catalog consistency check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns every issue found.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Returns whether the catalog is consistent.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Converts the report into a validation error listing every issue.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_clean() {
            return Ok(());
        }

        let messages: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        Err(AppError::Validation(format!(
            "seed catalog has {} inconsistencies: {}",
            messages.len(),
            messages.join("; ")
        )))
    }

    fn push(&mut self, kind: ValidationIssueKind, source: &str, reference: &str) {
        self.issues.push(ValidationIssue {
            kind,
            source: source.to_owned(),
            reference: reference.to_owned(),
        });
    }
}

/// Checks that menus, role-permission mappings, literal policy rows and
/// inheritance rows only reference templates the catalog declares.
///
/// The check is advisory. Every issue is logged at warn level and nothing
/// is blocked.
#[must_use]
pub fn validate_catalog(loader: &dyn DataLoader) -> ValidationReport {
    let permission_names: BTreeSet<&str> = loader
        .permissions()
        .iter()
        .map(|permission| permission.name.as_str())
        .collect();
    let role_slugs: BTreeSet<&str> = loader.roles().iter().map(|role| role.slug.as_str()).collect();
    let mut report = ValidationReport::default();

    for menu in loader.menus() {
        if let Some(permission) = menu.permission.as_deref()
            && !permission_names.contains(permission)
        {
            report.push(ValidationIssueKind::MenuPermission, &menu.slug, permission);
        }
    }

    for (role_slug, names) in loader.role_permissions().iter() {
        if !role_slugs.contains(role_slug) {
            report.push(ValidationIssueKind::MappedRole, role_slug, role_slug);
        }
        for name in names {
            if !permission_names.contains(name.as_str()) {
                report.push(ValidationIssueKind::MappedPermission, role_slug, name);
            }
        }
    }

    for row in loader.policy_rules() {
        let Some(subject) = row.first() else {
            continue;
        };
        if subject != WILDCARD && !role_slugs.contains(subject.as_str()) {
            report.push(ValidationIssueKind::PolicySubject, &row.join(", "), subject);
        }
    }

    for row in loader.inheritance_rules() {
        for role in row.iter().take(2) {
            if role != WILDCARD && !role_slugs.contains(role.as_str()) {
                report.push(ValidationIssueKind::InheritanceRole, &row.join(", "), role);
            }
        }
    }

    for issue in report.issues() {
        warn!(%issue, "seed catalog inconsistency");
    }

    report
}

#[cfg(test)]
mod tests {
    use groundwork_domain::{
        MenuTemplate, MenuTier, PermissionTemplate, RolePermissionMapping, RoleTemplate,
    };

    use super::{ValidationIssueKind, validate_catalog};
    use crate::SeedCatalog;

    fn role(slug: &str) -> RoleTemplate {
        RoleTemplate {
            name: slug.to_owned(),
            slug: slug.to_owned(),
            disabled: false,
            description: String::new(),
        }
    }

    fn permission(name: &str) -> PermissionTemplate {
        PermissionTemplate {
            name: name.to_owned(),
            action: "read".to_owned(),
            subject: "post".to_owned(),
            description: String::new(),
            disabled: false,
        }
    }

    fn menu(slug: &str, permission: Option<&str>) -> MenuTemplate {
        MenuTemplate {
            slug: slug.to_owned(),
            title: slug.to_owned(),
            path: format!("/{slug}"),
            tier: MenuTier::Header,
            parent_slug: None,
            permission: permission.map(str::to_owned),
            sort_order: 0,
        }
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn consistent_catalog_is_clean() {
        let catalog = SeedCatalog {
            roles: vec![role("editor")],
            permissions: vec![permission("Post Read")],
            role_permissions: RolePermissionMapping::from_entries([(
                "editor",
                ["Post Read"].as_slice(),
            )]),
            menus: vec![menu("posts", Some("Post Read")), menu("home", None)],
            policy_rules: vec![
                row(&["editor", "*", "/content/posts", "GET"]),
                row(&["*", "*", "/health", "GET"]),
            ],
            inheritance_rules: vec![row(&["editor", "*", "*"])],
            ..SeedCatalog::default()
        };

        let report = validate_catalog(&catalog);
        assert!(report.is_clean());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn dangling_references_are_reported() {
        let catalog = SeedCatalog {
            roles: vec![role("editor")],
            permissions: vec![permission("Post Read")],
            role_permissions: RolePermissionMapping::from_entries([
                ("editor", ["Post Write"].as_slice()),
                ("ghost", ["Post Read"].as_slice()),
            ]),
            menus: vec![menu("media", Some("Media Manage"))],
            policy_rules: vec![row(&["auditor", "*", "/system/audit-logs", "GET"])],
            inheritance_rules: vec![row(&["editor", "viewer", "*"]), row(&["*", "editor", "*"])],
            ..SeedCatalog::default()
        };

        let report = validate_catalog(&catalog);
        let kinds: Vec<_> = report.issues().iter().map(|issue| issue.kind).collect();

        assert_eq!(
            kinds,
            vec![
                ValidationIssueKind::MenuPermission,
                ValidationIssueKind::MappedPermission,
                ValidationIssueKind::MappedRole,
                ValidationIssueKind::PolicySubject,
                ValidationIssueKind::InheritanceRole,
            ]
        );
        assert_eq!(
            report.issues().last().map(|issue| issue.reference.as_str()),
            Some("viewer")
        );
        assert!(matches!(
            report.into_result(),
            Err(groundwork_core::AppError::Validation(message)) if message.contains("Media Manage")
        ));
    }
}
