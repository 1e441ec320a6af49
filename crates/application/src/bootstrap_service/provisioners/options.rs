use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use groundwork_core::AppResult;
use groundwork_domain::BootstrapStep;

use crate::bootstrap_ports::{OptionRepository, TenantRepository};

use super::super::context::BootstrapContext;
use super::super::guard::GuardDecision;
use super::{ProvisionSummary, Provisioner, creation_failed, require_tenant};

/// Seeds options into the default tenant's scope.
pub(super) struct OptionProvisioner {
    options: Arc<dyn OptionRepository>,
    tenants: Arc<dyn TenantRepository>,
}

impl OptionProvisioner {
    pub(super) fn new(options: Arc<dyn OptionRepository>, tenants: Arc<dyn TenantRepository>) -> Self {
        Self { options, tenants }
    }
}

#[async_trait]
impl Provisioner for OptionProvisioner {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let tenant = require_tenant(self.tenants.as_ref(), context.default_tenant_slug()).await?;
        let scope = Some(tenant.tenant_id);
        let existing = self.options.count_options(scope).await?;
        let mut summary = ProvisionSummary::default();
        if GuardDecision::for_count(BootstrapStep::Options, existing) != GuardDecision::Provision {
            info!(component = "options", existing, "options already present, skipping");
            summary.skipped = context.loader().options().len();
            return Ok(summary);
        }

        for template in context.loader().options() {
            if self.options.find_option(scope, &template.key).await?.is_some() {
                summary.skipped += 1;
                continue;
            }

            self.options
                .create_option(scope, &template.key, &template.value)
                .await
                .map_err(creation_failed("option", &template.key))?;
            summary.created += 1;
        }

        Ok(summary)
    }
}
