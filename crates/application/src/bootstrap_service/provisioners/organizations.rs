use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use groundwork_core::{AppError, AppResult, TenantId};
use groundwork_domain::{BootstrapStep, OrganizationTemplate, UserId};

use crate::bootstrap_ports::{
    NewOrganization, OrganizationRepository, TenantRepository, UserRecord, UserRepository,
};

use super::super::context::BootstrapContext;
use super::super::guard::GuardDecision;
use super::{ProvisionSummary, Provisioner, creation_failed, require_tenant};

/// Creates organization trees depth-first, guarded per tenant.
pub(super) struct OrganizationProvisioner {
    organizations: Arc<dyn OrganizationRepository>,
    tenants: Arc<dyn TenantRepository>,
    users: Arc<dyn UserRepository>,
}

impl OrganizationProvisioner {
    pub(super) fn new(
        organizations: Arc<dyn OrganizationRepository>,
        tenants: Arc<dyn TenantRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            organizations,
            tenants,
            users,
        }
    }

    /// Returns the first admin candidate of the mode that exists.
    async fn resolve_admin(&self, context: &BootstrapContext) -> AppResult<UserRecord> {
        let candidates = context.profile().admin_candidate_usernames();
        for username in candidates {
            if let Some(user) = self.users.find_user_by_username(username).await? {
                return Ok(user);
            }
        }

        Err(AppError::DependencyMissing(format!(
            "no admin user found among [{}]",
            candidates.join(", ")
        )))
    }

    async fn resolve_leader(&self, code: &str, leader: Option<&str>) -> AppResult<Option<UserId>> {
        let Some(username) = leader else {
            return Ok(None);
        };

        let user = self
            .users
            .find_user_by_username(&username.to_ascii_lowercase())
            .await?;
        if user.is_none() {
            warn!(organization = code, leader = username, "leader not found");
        }

        Ok(user.map(|user| user.user_id))
    }

    async fn provision_tree(
        &self,
        tenant_id: TenantId,
        root: &OrganizationTemplate,
        admin_id: UserId,
        summary: &mut ProvisionSummary,
    ) -> AppResult<()> {
        let mut pending: Vec<(&OrganizationTemplate, Option<Uuid>)> = vec![(root, None)];

        while let Some((template, parent_id)) = pending.pop() {
            let organization_id = match self
                .organizations
                .find_organization_by_code(tenant_id, &template.code)
                .await?
            {
                Some(organization) => {
                    summary.skipped += 1;
                    organization.organization_id
                }
                None => {
                    let mut leader_id = self
                        .resolve_leader(&template.code, template.leader.as_deref())
                        .await?;
                    if parent_id.is_none() && leader_id.is_none() {
                        leader_id = Some(admin_id);
                    }

                    let organization = self
                        .organizations
                        .create_organization(NewOrganization {
                            tenant_id,
                            code: template.code.clone(),
                            name: template.name.clone(),
                            kind: template.kind,
                            parent_id,
                            leader_id,
                        })
                        .await
                        .map_err(creation_failed("organization", &template.code))?;
                    summary.created += 1;
                    organization.organization_id
                }
            };

            pending.extend(
                template
                    .children
                    .iter()
                    .rev()
                    .map(|child| (child, Some(organization_id))),
            );
        }

        Ok(())
    }
}

#[async_trait]
impl Provisioner for OrganizationProvisioner {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let mut trees: BTreeMap<&str, Vec<&OrganizationTemplate>> = BTreeMap::new();
        for root in context.loader().organizations() {
            let tenant_slug = root
                .tenant_slug
                .as_deref()
                .unwrap_or(context.default_tenant_slug());
            trees.entry(tenant_slug).or_default().push(root);
        }

        let mut summary = ProvisionSummary::default();
        let mut admin_id: Option<UserId> = None;

        for (tenant_slug, roots) in trees {
            let tenant = require_tenant(self.tenants.as_ref(), tenant_slug).await?;
            let existing = self.organizations.count_organizations(tenant.tenant_id).await?;
            if GuardDecision::for_count(BootstrapStep::Organizations, existing)
                != GuardDecision::Provision
            {
                info!(
                    component = "organizations",
                    tenant = tenant_slug,
                    existing,
                    "organizations already present, skipping tenant"
                );
                summary.skipped += roots.iter().map(|root| root.node_count()).sum::<usize>();
                continue;
            }

            let leader_id = match admin_id {
                Some(user_id) => user_id,
                None => {
                    let user_id = self.resolve_admin(context).await?.user_id;
                    admin_id = Some(user_id);
                    user_id
                }
            };

            for root in roots {
                self.provision_tree(tenant.tenant_id, root, leader_id, &mut summary)
                    .await?;
            }
        }

        Ok(summary)
    }
}
