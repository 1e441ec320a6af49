//! Terse constructors for built-in seed rows.

use groundwork_domain::{
    DictionaryItemTemplate, DictionaryTemplate, EmployeeTemplate, MenuTemplate, MenuTier,
    OptionTemplate, OrganizationKind, OrganizationTemplate, PermissionTemplate, RoleTemplate,
    TenantTemplate, UserTemplate,
};

/// Initial password of every built-in account.
pub(super) const SEED_PASSWORD: &str = "change-me-on-first-login";

pub(super) fn role(slug: &str, name: &str, description: &str) -> RoleTemplate {
    RoleTemplate {
        name: name.to_owned(),
        slug: slug.to_owned(),
        disabled: false,
        description: description.to_owned(),
    }
}

pub(super) fn permission(name: &str, action: &str, subject: &str) -> PermissionTemplate {
    PermissionTemplate {
        name: name.to_owned(),
        action: action.to_owned(),
        subject: subject.to_owned(),
        description: String::new(),
        disabled: false,
    }
}

pub(super) fn tenant(slug: &str, name: &str, parent_slug: Option<&str>) -> TenantTemplate {
    TenantTemplate {
        slug: slug.to_owned(),
        name: name.to_owned(),
        description: String::new(),
        parent_slug: parent_slug.map(str::to_owned),
    }
}

pub(super) fn user(
    username: &str,
    display_name: &str,
    roles: &[&str],
    tenant_slug: Option<&str>,
    employee: Option<EmployeeTemplate>,
) -> UserTemplate {
    UserTemplate {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        display_name: display_name.to_owned(),
        password: SEED_PASSWORD.to_owned(),
        roles: roles.iter().map(|role| (*role).to_owned()).collect(),
        tenant_slug: tenant_slug.map(str::to_owned),
        employee,
    }
}

pub(super) fn employee(
    employee_number: &str,
    department: Option<&str>,
    position: &str,
    manager: Option<&str>,
) -> Option<EmployeeTemplate> {
    Some(EmployeeTemplate {
        employee_number: employee_number.to_owned(),
        department: department.map(str::to_owned),
        position: position.to_owned(),
        manager: manager.map(str::to_owned),
    })
}

pub(super) fn menu(
    slug: &str,
    title: &str,
    path: &str,
    tier: MenuTier,
    parent_slug: Option<&str>,
    permission: Option<&str>,
    sort_order: i32,
) -> MenuTemplate {
    MenuTemplate {
        slug: slug.to_owned(),
        title: title.to_owned(),
        path: path.to_owned(),
        tier,
        parent_slug: parent_slug.map(str::to_owned),
        permission: permission.map(str::to_owned),
        sort_order,
    }
}

pub(super) fn option(key: &str, value: &str) -> OptionTemplate {
    OptionTemplate {
        key: key.to_owned(),
        value: value.to_owned(),
    }
}

pub(super) fn dictionary(code: &str, name: &str, items: &[(&str, &str)]) -> DictionaryTemplate {
    DictionaryTemplate {
        code: code.to_owned(),
        name: name.to_owned(),
        description: String::new(),
        items: items
            .iter()
            .zip(1..)
            .map(|((label, value), sort_order)| DictionaryItemTemplate {
                label: (*label).to_owned(),
                value: (*value).to_owned(),
                sort_order,
            })
            .collect(),
    }
}

pub(super) fn organization(
    code: &str,
    name: &str,
    kind: OrganizationKind,
    leader: Option<&str>,
    children: Vec<OrganizationTemplate>,
) -> OrganizationTemplate {
    OrganizationTemplate {
        code: code.to_owned(),
        name: name.to_owned(),
        kind,
        tenant_slug: None,
        leader: leader.map(str::to_owned),
        children,
    }
}

pub(super) fn in_tenant(mut root: OrganizationTemplate, tenant_slug: &str) -> OrganizationTemplate {
    root.tenant_slug = Some(tenant_slug.to_owned());
    root
}

pub(super) fn rule(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}
