use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use groundwork_core::AppResult;
use groundwork_domain::{PolicyTuple, ResourceActionMap, WILDCARD};

use crate::bootstrap_ports::{PolicyRepository, RoleRepository, TenantRepository, UserRepository};

use super::context::BootstrapContext;
use super::provisioners::{ProvisionSummary, Provisioner};

/// Tuples inserted by each compiler pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyCompilationReport {
    /// `p` tuples compiled from role-permission links.
    pub dynamic_inserted: usize,
    /// Literal `p` rows from the catalog.
    pub static_inserted: usize,
    /// Literal `g` rows from the catalog.
    pub inheritance_inserted: usize,
    /// `g` tuples compiled from user-role bindings.
    pub binding_inserted: usize,
    /// Catalog rows rejected for their arity.
    pub malformed_rows: usize,
    /// Passes that stopped on a storage error.
    pub failed_passes: Vec<&'static str>,
}

impl PolicyCompilationReport {
    /// Returns the number of tuples inserted by all passes.
    #[must_use]
    pub fn total_inserted(&self) -> usize {
        self.dynamic_inserted
            + self.static_inserted
            + self.inheritance_inserted
            + self.binding_inserted
    }
}

/// Compiles roles, permissions, catalog rules and user bindings into
/// authorization tuples.
///
/// Every pass inserts a tuple only when the identical tuple is absent, so a
/// re-run adds nothing. A pass that fails is logged and does not stop the
/// others.
pub(crate) struct PolicyCompiler {
    roles: Arc<dyn RoleRepository>,
    tenants: Arc<dyn TenantRepository>,
    users: Arc<dyn UserRepository>,
    policies: Arc<dyn PolicyRepository>,
    resource_map: ResourceActionMap,
}

impl PolicyCompiler {
    pub(crate) fn new(
        roles: Arc<dyn RoleRepository>,
        tenants: Arc<dyn TenantRepository>,
        users: Arc<dyn UserRepository>,
        policies: Arc<dyn PolicyRepository>,
        resource_map: ResourceActionMap,
    ) -> Self {
        Self {
            roles,
            tenants,
            users,
            policies,
            resource_map,
        }
    }

    /// Runs every pass and reports what each one inserted.
    pub(crate) async fn compile(&self, context: &BootstrapContext) -> PolicyCompilationReport {
        let mut report = PolicyCompilationReport::default();
        let domain = self.resolve_domain(context).await;

        match self.dynamic_pass(&domain).await {
            Ok(inserted) => report.dynamic_inserted = inserted,
            Err(error) => Self::record_failure(&mut report, "dynamic", &error),
        }

        let static_rows = context.loader().policy_rules();
        match self
            .literal_pass(static_rows, PolicyTuple::from_policy_row, &mut report.malformed_rows)
            .await
        {
            Ok(inserted) => report.static_inserted = inserted,
            Err(error) => Self::record_failure(&mut report, "static", &error),
        }

        let inheritance_rows = context.loader().inheritance_rules();
        match self
            .literal_pass(
                inheritance_rows,
                PolicyTuple::from_inheritance_row,
                &mut report.malformed_rows,
            )
            .await
        {
            Ok(inserted) => report.inheritance_inserted = inserted,
            Err(error) => Self::record_failure(&mut report, "inheritance", &error),
        }

        match self.binding_pass().await {
            Ok(inserted) => report.binding_inserted = inserted,
            Err(error) => Self::record_failure(&mut report, "bindings", &error),
        }

        info!(
            component = "policies",
            dynamic = report.dynamic_inserted,
            static_rules = report.static_inserted,
            inheritance = report.inheritance_inserted,
            bindings = report.binding_inserted,
            malformed = report.malformed_rows,
            "policy compilation finished"
        );

        report
    }

    fn record_failure(
        report: &mut PolicyCompilationReport,
        pass: &'static str,
        failure: &groundwork_core::AppError,
    ) {
        error!(component = "policies", pass, error = %failure, "policy pass failed");
        report.failed_passes.push(pass);
    }

    /// Uses the default tenant's identifier, or the wildcard domain when the
    /// tenant cannot be loaded.
    async fn resolve_domain(&self, context: &BootstrapContext) -> String {
        match self
            .tenants
            .find_tenant_by_slug(context.default_tenant_slug())
            .await
        {
            Ok(Some(tenant)) => tenant.tenant_id.to_string(),
            Ok(None) => {
                warn!(
                    tenant = context.default_tenant_slug(),
                    "default tenant not found, compiling policies for every domain"
                );
                WILDCARD.to_owned()
            }
            Err(error) => {
                warn!(%error, "failed to load default tenant, compiling policies for every domain");
                WILDCARD.to_owned()
            }
        }
    }

    async fn insert_if_absent(&self, tuple: PolicyTuple) -> AppResult<bool> {
        if self.policies.find_policy(&tuple).await?.is_some() {
            return Ok(false);
        }

        self.policies.create_policy(tuple).await?;
        Ok(true)
    }

    async fn dynamic_pass(&self, domain: &str) -> AppResult<usize> {
        let mut inserted = 0;

        for role in self.roles.list_roles().await? {
            for permission in self.roles.list_role_permissions(role.role_id).await? {
                if permission.disabled {
                    continue;
                }

                let Some(route) = self
                    .resource_map
                    .route_for(&permission.subject, &permission.action)
                else {
                    debug!(
                        permission = permission.name.as_str(),
                        "permission maps to no route"
                    );
                    continue;
                };

                let tuple = PolicyTuple::policy(
                    role.slug.as_str(),
                    domain,
                    route.resource_path,
                    route.http_method,
                );
                if self.insert_if_absent(tuple).await? {
                    inserted += 1;
                }
            }
        }

        Ok(inserted)
    }

    async fn literal_pass<E: std::fmt::Display + Send>(
        &self,
        rows: &[Vec<String>],
        parse: fn(&[String]) -> Result<PolicyTuple, E>,
        malformed: &mut usize,
    ) -> AppResult<usize> {
        let mut inserted = 0;

        for row in rows {
            let tuple = match parse(row) {
                Ok(tuple) => tuple,
                Err(rejection) => {
                    warn!(component = "policies", %rejection, "skipping malformed seed row");
                    *malformed += 1;
                    continue;
                }
            };

            if self.insert_if_absent(tuple).await? {
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    async fn binding_pass(&self) -> AppResult<usize> {
        let mut inserted = 0;

        for binding in self.users.list_role_bindings(None).await? {
            let tuple = PolicyTuple::grouping(
                binding.user_id.to_string(),
                binding.role_slug,
                binding.tenant_id.to_string(),
            );
            if self.insert_if_absent(tuple).await? {
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}

#[async_trait]
impl Provisioner for PolicyCompiler {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let report = self.compile(context).await;

        Ok(ProvisionSummary {
            created: report.total_inserted(),
            skipped: report.malformed_rows,
            repaired: 0,
        })
    }
}
