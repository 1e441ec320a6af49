use groundwork_application::SeedCatalog;
use groundwork_domain::{MenuTier, OrganizationKind, RolePermissionMapping};

use super::templates::{
    dictionary, employee, in_tenant, menu, option, organization, permission, role, rule, tenant,
    user,
};

pub(super) fn catalog() -> SeedCatalog {
    SeedCatalog {
        roles: vec![
            role("group-admin", "Group Administrator", "Full access across the group"),
            role("subsidiary-admin", "Subsidiary Administrator", "Administers one subsidiary"),
            role("department-manager", "Department Manager", "Leads a department"),
            role("auditor", "Auditor", "Read-only compliance access"),
            role("employee", "Employee", "Regular staff member"),
        ],
        permissions: vec![
            permission("System Manage", "manage", "*"),
            permission("Tenant Manage", "manage", "tenant"),
            permission("Tenant Read", "read", "tenant"),
            permission("Employee Management", "manage", "employee"),
            permission("Employee Read", "read", "employee"),
            permission("Organization Manage", "manage", "organization"),
            permission("Organization Read", "read", "organization"),
            permission("Report Read", "read", "report"),
            permission("Report Export", "export", "report"),
            permission("Audit Read", "read", "audit"),
            permission("Profile Update", "update", "profile"),
            permission("Dashboard View", "read", "dashboard"),
        ],
        role_permissions: RolePermissionMapping::from_entries([
            ("group-admin", ["System Manage"].as_slice()),
            (
                "subsidiary-admin",
                [
                    "Tenant Read",
                    "Employee Management",
                    "Organization Manage",
                    "Report Export",
                    "Dashboard View",
                ]
                .as_slice(),
            ),
            (
                "department-manager",
                [
                    "Employee Management",
                    "Organization Read",
                    "Report Read",
                    "Dashboard View",
                ]
                .as_slice(),
            ),
            ("auditor", ["Audit Read", "Report Read", "Tenant Read"].as_slice()),
            (
                "employee",
                ["Employee Read", "Profile Update", "Dashboard View"].as_slice(),
            ),
        ]),
        policy_rules: vec![
            rule(&["group-admin", "*", "*", "*"]),
            rule(&["employee", "*", "/user/profile", "GET"]),
        ],
        inheritance_rules: vec![
            rule(&["subsidiary-admin", "department-manager", "*"]),
            rule(&["department-manager", "employee", "*"]),
        ],
        users: vec![
            user(
                "group.admin",
                "Group Administrator",
                &["group-admin"],
                None,
                employee("HQ-001", Some("group"), "Group Chief Executive", None),
            ),
            user(
                "auditor",
                "Group Auditor",
                &["auditor"],
                None,
                employee("HQ-002", Some("group-compliance"), "Internal Auditor", Some("group.admin")),
            ),
            user(
                "north.engineer",
                "North Engineer",
                &["employee"],
                Some("north-division"),
                employee("N-003", Some("north-engineering"), "Engineer", Some("north.manager")),
            ),
            user(
                "north.manager",
                "North Engineering Manager",
                &["department-manager"],
                Some("north-division"),
                employee("N-002", Some("north-engineering"), "Engineering Manager", Some("north.admin")),
            ),
            user(
                "north.admin",
                "North Division Administrator",
                &["subsidiary-admin"],
                Some("north-division"),
                employee("N-001", Some("north"), "Division Director", Some("group.admin")),
            ),
            user(
                "south.admin",
                "South Division Administrator",
                &["subsidiary-admin"],
                Some("south-division"),
                employee("S-001", Some("south"), "Division Director", Some("group.admin")),
            ),
        ],
        tenants: vec![
            tenant("group-hq", "Group Headquarters", None),
            tenant("north-division", "North Division", Some("group-hq")),
            tenant("south-division", "South Division", Some("group-hq")),
        ],
        menus: vec![
            menu("dashboard", "Dashboard", "/dashboard", MenuTier::Header, None, Some("Dashboard View"), 1),
            menu("group", "Group", "/system/tenants", MenuTier::Header, None, Some("Tenant Read"), 2),
            menu("people", "People", "/user", MenuTier::Header, None, Some("Employee Read"), 3),
            menu("compliance", "Compliance", "/system/audit-logs", MenuTier::Header, None, Some("Audit Read"), 4),
            menu("group.subsidiaries", "Subsidiaries", "/system/tenants", MenuTier::Sidebar, Some("group"), Some("Tenant Read"), 1),
            menu("group.organizations", "Organizations", "/org/organizations", MenuTier::Sidebar, Some("group"), Some("Organization Read"), 2),
            menu("people.employees", "Employees", "/user/employees", MenuTier::Sidebar, Some("people"), Some("Employee Read"), 1),
            menu("compliance.audit", "Audit log", "/system/audit-logs", MenuTier::Sidebar, Some("compliance"), Some("Audit Read"), 1),
            menu("compliance.audit.export", "Export", "/report/reports/export", MenuTier::Submenu, Some("compliance.audit"), Some("Report Export"), 1),
        ],
        options: vec![
            option("group.name", "Group Holdings"),
            option("group.currency", "EUR"),
            option("consolidation.enabled", "true"),
        ],
        dictionaries: vec![
            dictionary(
                "subsidiary_type",
                "Subsidiary type",
                &[("Wholly owned", "wholly_owned"), ("Joint venture", "joint_venture")],
            ),
            dictionary(
                "employee_status",
                "Employee status",
                &[("Active", "active"), ("On leave", "on_leave"), ("Terminated", "terminated")],
            ),
            dictionary(
                "region",
                "Region",
                &[("North", "north"), ("South", "south")],
            ),
        ],
        organizations: vec![
            organization(
                "group",
                "Group Headquarters",
                OrganizationKind::Company,
                None,
                vec![
                    organization(
                        "group-finance",
                        "Group Finance",
                        OrganizationKind::Department,
                        None,
                        Vec::new(),
                    ),
                    organization(
                        "group-compliance",
                        "Group Compliance",
                        OrganizationKind::Department,
                        Some("auditor"),
                        Vec::new(),
                    ),
                ],
            ),
            in_tenant(
                organization(
                    "north",
                    "North Division",
                    OrganizationKind::Division,
                    Some("north.admin"),
                    vec![organization(
                        "north-engineering",
                        "North Engineering",
                        OrganizationKind::Department,
                        Some("north.manager"),
                        Vec::new(),
                    )],
                ),
                "north-division",
            ),
            in_tenant(
                organization(
                    "south",
                    "South Division",
                    OrganizationKind::Division,
                    Some("south.admin"),
                    Vec::new(),
                ),
                "south-division",
            ),
        ],
    }
}
