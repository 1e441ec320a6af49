use groundwork_application::SeedCatalog;
use groundwork_domain::{MenuTier, OrganizationKind, RolePermissionMapping};

use super::templates::{
    dictionary, employee, menu, option, organization, permission, role, rule, tenant, user,
};

pub(super) fn catalog() -> SeedCatalog {
    SeedCatalog {
        roles: vec![
            role("company-admin", "Company Administrator", "Full access to the company"),
            role("hr-manager", "HR Manager", "Manages staff records and structure"),
            role("department-manager", "Department Manager", "Leads a department"),
            role("employee", "Employee", "Regular staff member"),
        ],
        permissions: vec![
            permission("System Manage", "manage", "*"),
            permission("Employee Management", "manage", "employee"),
            permission("Employee Read", "read", "employee"),
            permission("Organization Manage", "manage", "organization"),
            permission("Organization Read", "read", "organization"),
            permission("Project Manage", "manage", "project"),
            permission("Task Manage", "manage", "task"),
            permission("Task Read", "read", "task"),
            permission("Report Read", "read", "report"),
            permission("Report Export", "export", "report"),
            permission("Profile Update", "update", "profile"),
            permission("Dashboard View", "read", "dashboard"),
        ],
        role_permissions: RolePermissionMapping::from_entries([
            ("company-admin", ["System Manage"].as_slice()),
            (
                "hr-manager",
                [
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
                    "Project Manage",
                    "Task Manage",
                    "Report Read",
                    "Dashboard View",
                ]
                .as_slice(),
            ),
            (
                "employee",
                ["Employee Read", "Task Read", "Profile Update", "Dashboard View"].as_slice(),
            ),
        ]),
        policy_rules: vec![rule(&["employee", "*", "/user/profile", "GET"])],
        inheritance_rules: vec![
            rule(&["department-manager", "employee", "*"]),
            rule(&["hr-manager", "employee", "*"]),
        ],
        users: vec![
            user(
                "company.admin",
                "Company Administrator",
                &["company-admin"],
                None,
                employee("ACME-0001", None, "Chief Executive Officer", None),
            ),
            user(
                "senior.developer",
                "Senior Developer",
                &["employee"],
                None,
                employee("ACME-0004", Some("engineering"), "Senior Developer", Some("tech.lead")),
            ),
            user(
                "tech.lead",
                "Tech Lead",
                &["department-manager"],
                None,
                employee("ACME-0003", Some("engineering"), "Engineering Lead", Some("company.admin")),
            ),
            user(
                "hr.manager",
                "HR Manager",
                &["hr-manager"],
                None,
                employee("ACME-0002", Some("human-resources"), "HR Manager", Some("company.admin")),
            ),
            user(
                "developer",
                "Developer",
                &["employee"],
                None,
                employee("ACME-0005", Some("platform"), "Developer", Some("senior.developer")),
            ),
        ],
        tenants: vec![tenant("acme-corp", "Acme Corporation", None)],
        menus: vec![
            menu("dashboard", "Dashboard", "/dashboard", MenuTier::Header, None, Some("Dashboard View"), 1),
            menu("organization", "Organization", "/org", MenuTier::Header, None, Some("Organization Read"), 2),
            menu("work", "Work", "/work", MenuTier::Header, None, Some("Task Read"), 3),
            menu("reports", "Reports", "/report", MenuTier::Header, None, Some("Report Read"), 4),
            menu("organization.employees", "Employees", "/user/employees", MenuTier::Sidebar, Some("organization"), Some("Employee Read"), 1),
            menu("organization.departments", "Departments", "/org/organizations", MenuTier::Sidebar, Some("organization"), Some("Organization Read"), 2),
            menu("work.projects", "Projects", "/work/projects", MenuTier::Sidebar, Some("work"), Some("Project Manage"), 1),
            menu("work.tasks", "Tasks", "/work/tasks", MenuTier::Sidebar, Some("work"), Some("Task Read"), 2),
            menu("reports.overview", "Overview", "/report/reports", MenuTier::Sidebar, Some("reports"), Some("Report Read"), 1),
            menu("reports.overview.export", "Export", "/report/reports/export", MenuTier::Submenu, Some("reports.overview"), Some("Report Export"), 1),
        ],
        options: vec![
            option("company.name", "Acme Corporation"),
            option("company.timezone", "UTC"),
            option("workweek.days", "5"),
            option("attendance.enabled", "true"),
        ],
        dictionaries: vec![
            dictionary(
                "employment_type",
                "Employment type",
                &[("Full time", "full_time"), ("Part time", "part_time"), ("Contractor", "contractor")],
            ),
            dictionary(
                "employee_status",
                "Employee status",
                &[("Active", "active"), ("On leave", "on_leave"), ("Terminated", "terminated")],
            ),
            dictionary(
                "project_status",
                "Project status",
                &[("Planned", "planned"), ("Active", "active"), ("Closed", "closed")],
            ),
        ],
        organizations: vec![organization(
            "acme",
            "Acme Corporation",
            OrganizationKind::Company,
            None,
            vec![
                organization(
                    "engineering",
                    "Engineering",
                    OrganizationKind::Department,
                    Some("tech.lead"),
                    vec![organization(
                        "platform",
                        "Platform Team",
                        OrganizationKind::Team,
                        Some("senior.developer"),
                        Vec::new(),
                    )],
                ),
                organization(
                    "human-resources",
                    "Human Resources",
                    OrganizationKind::Department,
                    Some("hr.manager"),
                    Vec::new(),
                ),
                organization("sales", "Sales", OrganizationKind::Department, None, Vec::new()),
            ],
        )],
    }
}
