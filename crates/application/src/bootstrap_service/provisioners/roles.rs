use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use groundwork_core::AppResult;
use groundwork_domain::BootstrapStep;

use crate::bootstrap_ports::{NewRole, RoleRepository};

use super::super::context::BootstrapContext;
use super::super::guard::GuardDecision;
use super::assignments::RolePermissionAssigner;
use super::{ProvisionSummary, Provisioner, creation_failed};

pub(super) struct RoleProvisioner {
    roles: Arc<dyn RoleRepository>,
    assigner: RolePermissionAssigner,
}

impl RoleProvisioner {
    pub(super) fn new(roles: Arc<dyn RoleRepository>, assigner: RolePermissionAssigner) -> Self {
        Self { roles, assigner }
    }
}

#[async_trait]
impl Provisioner for RoleProvisioner {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let existing = self.roles.count_roles().await?;
        let mut summary = ProvisionSummary::default();

        match GuardDecision::for_count(BootstrapStep::Roles, existing) {
            GuardDecision::Provision => {
                for template in context.loader().roles() {
                    if self.roles.find_role_by_slug(&template.slug).await?.is_some() {
                        summary.skipped += 1;
                        continue;
                    }

                    self.roles
                        .create_role(NewRole {
                            slug: template.slug.clone(),
                            name: template.name.clone(),
                            disabled: template.disabled,
                            description: template.description.clone(),
                        })
                        .await
                        .map_err(creation_failed("role", &template.slug))?;
                    summary.created += 1;
                }
            }
            GuardDecision::Verify | GuardDecision::Skip => {
                info!(component = "roles", existing, "roles already present, verifying assignments");
                summary.repaired = self.assigner.ensure(context).await?;
                if summary.repaired > 0 {
                    warn!(
                        component = "roles",
                        repaired = summary.repaired,
                        "repaired missing role-permission assignments"
                    );
                }
            }
        }

        Ok(summary)
    }
}
