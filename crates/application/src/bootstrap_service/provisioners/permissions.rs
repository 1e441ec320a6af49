use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use groundwork_core::AppResult;
use groundwork_domain::BootstrapStep;

use crate::bootstrap_ports::{NewPermission, PermissionRepository};

use super::super::context::BootstrapContext;
use super::super::guard::GuardDecision;
use super::assignments::RolePermissionAssigner;
use super::{ProvisionSummary, Provisioner, creation_failed};

pub(super) struct PermissionProvisioner {
    permissions: Arc<dyn PermissionRepository>,
    assigner: RolePermissionAssigner,
}

impl PermissionProvisioner {
    pub(super) fn new(
        permissions: Arc<dyn PermissionRepository>,
        assigner: RolePermissionAssigner,
    ) -> Self {
        Self {
            permissions,
            assigner,
        }
    }
}

#[async_trait]
impl Provisioner for PermissionProvisioner {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let existing = self.permissions.count_permissions().await?;
        let mut summary = ProvisionSummary::default();

        if GuardDecision::for_count(BootstrapStep::Permissions, existing) == GuardDecision::Provision
        {
            for template in context.loader().permissions() {
                if self
                    .permissions
                    .find_permission_by_name(&template.name)
                    .await?
                    .is_some()
                {
                    summary.skipped += 1;
                    continue;
                }

                self.permissions
                    .create_permission(NewPermission {
                        name: template.name.clone(),
                        action: template.action.clone(),
                        subject: template.subject.clone(),
                        description: template.description.clone(),
                        disabled: template.disabled,
                    })
                    .await
                    .map_err(creation_failed("permission", &template.name))?;
                summary.created += 1;
            }
        } else {
            info!(
                component = "permissions",
                existing, "permissions already present, verifying assignments"
            );
        }

        let assigned = self.assigner.ensure(context).await?;
        if existing == 0 {
            summary.created += assigned;
        } else {
            summary.repaired += assigned;
        }

        Ok(summary)
    }
}
