use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use groundwork_core::AppResult;

use crate::bootstrap_ports::{PermissionRepository, RoleRepository};

use super::super::context::BootstrapContext;
use super::creation_failed;

/// Links catalog permissions to catalog roles.
#[derive(Clone)]
pub(super) struct RolePermissionAssigner {
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
}

impl RolePermissionAssigner {
    pub(super) fn new(
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
    ) -> Self {
        Self { roles, permissions }
    }

    /// Creates missing role-permission links and returns how many were added.
    ///
    /// Mapping entries naming an unknown role or permission are skipped.
    pub(super) async fn ensure(&self, context: &BootstrapContext) -> AppResult<usize> {
        let mut assigned = 0;

        for (role_slug, permission_names) in context.loader().role_permissions().iter() {
            let Some(role) = self.roles.find_role_by_slug(role_slug).await? else {
                warn!(role_slug, "role-permission mapping references an unknown role");
                continue;
            };

            let linked: BTreeSet<_> = self
                .roles
                .list_role_permissions(role.role_id)
                .await?
                .into_iter()
                .map(|permission| permission.permission_id)
                .collect();

            for permission_name in permission_names {
                let Some(permission) = self
                    .permissions
                    .find_permission_by_name(permission_name)
                    .await?
                else {
                    warn!(
                        role_slug,
                        permission_name = permission_name.as_str(),
                        "role-permission mapping references an unknown permission"
                    );
                    continue;
                };

                if linked.contains(&permission.permission_id) {
                    continue;
                }

                self.roles
                    .assign_permission(role.role_id, permission.permission_id)
                    .await
                    .map_err(creation_failed(
                        "role-permission link",
                        &format!("{role_slug} -> {permission_name}"),
                    ))?;
                assigned += 1;
            }
        }

        Ok(assigned)
    }
}
