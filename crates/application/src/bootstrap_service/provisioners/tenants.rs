use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use groundwork_core::{AppResult, TenantId};
use groundwork_domain::BootstrapStep;

use crate::bootstrap_ports::{NewTenant, TenantRepository};

use super::super::context::BootstrapContext;
use super::super::guard::GuardDecision;
use super::{ProvisionSummary, Provisioner, creation_failed};

pub(super) struct TenantProvisioner {
    tenants: Arc<dyn TenantRepository>,
}

impl TenantProvisioner {
    pub(super) fn new(tenants: Arc<dyn TenantRepository>) -> Self {
        Self { tenants }
    }

    async fn resolve_parent(
        &self,
        parent_slug: &str,
        known: &HashMap<String, TenantId>,
    ) -> AppResult<Option<TenantId>> {
        if let Some(tenant_id) = known.get(parent_slug) {
            return Ok(Some(*tenant_id));
        }

        Ok(self
            .tenants
            .find_tenant_by_slug(parent_slug)
            .await?
            .map(|tenant| tenant.tenant_id))
    }
}

#[async_trait]
impl Provisioner for TenantProvisioner {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let existing = self.tenants.count_tenants().await?;
        let mut summary = ProvisionSummary::default();
        if GuardDecision::for_count(BootstrapStep::Tenants, existing) != GuardDecision::Provision {
            info!(component = "tenants", existing, "tenants already present, skipping");
            summary.skipped = context.loader().tenants().len();
            return Ok(summary);
        }

        let mut known = HashMap::new();
        for template in context.loader().tenants() {
            if let Some(tenant) = self.tenants.find_tenant_by_slug(&template.slug).await? {
                known.insert(template.slug.clone(), tenant.tenant_id);
                summary.skipped += 1;
                continue;
            }

            let parent_id = match template.parent_slug.as_deref() {
                Some(parent_slug) => {
                    let parent_id = self.resolve_parent(parent_slug, &known).await?;
                    if parent_id.is_none() {
                        warn!(
                            tenant = template.slug.as_str(),
                            parent_slug, "parent tenant not found, creating as root"
                        );
                    }
                    parent_id
                }
                None => None,
            };

            let tenant = self
                .tenants
                .create_tenant(NewTenant {
                    slug: template.slug.clone(),
                    name: template.name.clone(),
                    description: template.description.clone(),
                    parent_id,
                })
                .await
                .map_err(creation_failed("tenant", &template.slug))?;
            known.insert(template.slug.clone(), tenant.tenant_id);
            summary.created += 1;
        }

        Ok(summary)
    }
}
