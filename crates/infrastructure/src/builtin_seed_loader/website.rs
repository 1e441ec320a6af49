use groundwork_application::SeedCatalog;
use groundwork_domain::{MenuTier, OrganizationKind, RolePermissionMapping};

use super::templates::{
    dictionary, employee, menu, option, organization, permission, role, rule, tenant, user,
};

pub(super) fn catalog() -> SeedCatalog {
    SeedCatalog {
        roles: vec![
            role("admin", "Administrator", "Full access to the site"),
            role("editor", "Editor", "Publishes and moderates all content"),
            role("author", "Author", "Writes and publishes own posts"),
            role("subscriber", "Subscriber", "Reads content and manages a profile"),
        ],
        permissions: vec![
            permission("System Manage", "manage", "*"),
            permission("User Manage", "manage", "user"),
            permission("Post Manage", "manage", "post"),
            permission("Post Read", "read", "post"),
            permission("Post Create", "create", "post"),
            permission("Page Manage", "manage", "page"),
            permission("Media Manage", "manage", "media"),
            permission("Comment Manage", "manage", "comment"),
            permission("Menu Manage", "manage", "menu"),
            permission("Option Manage", "manage", "option"),
            permission("Dashboard View", "read", "dashboard"),
        ],
        role_permissions: RolePermissionMapping::from_entries([
            ("admin", ["System Manage"].as_slice()),
            (
                "editor",
                [
                    "Post Manage",
                    "Page Manage",
                    "Media Manage",
                    "Comment Manage",
                    "Dashboard View",
                ]
                .as_slice(),
            ),
            (
                "author",
                ["Post Read", "Post Create", "Media Manage", "Dashboard View"].as_slice(),
            ),
            ("subscriber", ["Post Read", "Dashboard View"].as_slice()),
        ]),
        policy_rules: vec![
            rule(&["subscriber", "*", "/user/profile", "GET"]),
            rule(&["subscriber", "*", "/user/profile", "PUT"]),
        ],
        inheritance_rules: vec![
            rule(&["editor", "author", "*"]),
            rule(&["author", "subscriber", "*"]),
        ],
        users: vec![
            user(
                "admin",
                "Site Administrator",
                &["admin"],
                None,
                employee("WEB-001", None, "Administrator", None),
            ),
            user(
                "editor",
                "Managing Editor",
                &["editor"],
                None,
                employee("WEB-002", None, "Editor", Some("admin")),
            ),
            user("author", "Staff Writer", &["author"], None, None),
        ],
        tenants: vec![tenant("main-site", "Main Site", None)],
        menus: vec![
            menu("dashboard", "Dashboard", "/dashboard", MenuTier::Header, None, Some("Dashboard View"), 1),
            menu("content", "Content", "/content", MenuTier::Header, None, None, 2),
            menu("system", "System", "/system", MenuTier::Header, None, Some("System Manage"), 3),
            menu("content.posts", "Posts", "/content/posts", MenuTier::Sidebar, Some("content"), Some("Post Read"), 1),
            menu("content.pages", "Pages", "/content/pages", MenuTier::Sidebar, Some("content"), Some("Page Manage"), 2),
            menu("content.media", "Media", "/content/media", MenuTier::Sidebar, Some("content"), Some("Media Manage"), 3),
            menu("content.comments", "Comments", "/content/comments", MenuTier::Sidebar, Some("content"), Some("Comment Manage"), 4),
            menu("system.users", "Users", "/user/users", MenuTier::Sidebar, Some("system"), Some("User Manage"), 1),
            menu("system.menus", "Menus", "/system/menus", MenuTier::Sidebar, Some("system"), Some("Menu Manage"), 2),
            menu("system.options", "Settings", "/system/options", MenuTier::Sidebar, Some("system"), Some("Option Manage"), 3),
            menu("content.posts.new", "New post", "/content/posts/new", MenuTier::Submenu, Some("content.posts"), Some("Post Create"), 1),
        ],
        options: vec![
            option("site.title", "Groundwork"),
            option("site.description", "Just another Groundwork site"),
            option("site.language", "en"),
            option("posts.per_page", "10"),
            option("comments.moderation", "true"),
        ],
        dictionaries: vec![
            dictionary(
                "post_status",
                "Post status",
                &[("Draft", "draft"), ("Published", "published"), ("Archived", "archived")],
            ),
            dictionary(
                "comment_status",
                "Comment status",
                &[("Pending", "pending"), ("Approved", "approved"), ("Spam", "spam")],
            ),
        ],
        organizations: vec![organization(
            "site-team",
            "Site Team",
            OrganizationKind::Team,
            None,
            Vec::new(),
        )],
    }
}
