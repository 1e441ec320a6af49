use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use groundwork_core::AppResult;
use groundwork_domain::{BootstrapStep, MenuTier};

use crate::bootstrap_ports::{MenuRepository, NewMenu};

use super::super::context::BootstrapContext;
use super::super::guard::GuardDecision;
use super::{ProvisionSummary, Provisioner, creation_failed};

/// Creates menus tier by tier so every parent exists before its children.
pub(super) struct MenuProvisioner {
    menus: Arc<dyn MenuRepository>,
}

impl MenuProvisioner {
    pub(super) fn new(menus: Arc<dyn MenuRepository>) -> Self {
        Self { menus }
    }
}

#[async_trait]
impl Provisioner for MenuProvisioner {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let existing = self.menus.count_menus().await?;
        let mut summary = ProvisionSummary::default();
        if GuardDecision::for_count(BootstrapStep::Menus, existing) != GuardDecision::Provision {
            info!(component = "menus", existing, "menus already present, skipping");
            summary.skipped = context.loader().menus().len();
            return Ok(summary);
        }

        let mut menu_ids: HashMap<&str, Uuid> = HashMap::new();
        for tier in MenuTier::all() {
            for template in context
                .loader()
                .menus()
                .iter()
                .filter(|template| template.tier == *tier)
            {
                if let Some(menu) = self.menus.find_menu_by_slug(&template.slug).await? {
                    menu_ids.insert(template.slug.as_str(), menu.menu_id);
                    summary.skipped += 1;
                    continue;
                }

                let parent_id = match (tier, template.parent_slug.as_deref()) {
                    (MenuTier::Header, _) | (_, None) => None,
                    (_, Some(parent_slug)) => match menu_ids.get(parent_slug) {
                        Some(parent_id) => Some(*parent_id),
                        None => {
                            warn!(
                                menu = template.slug.as_str(),
                                parent_slug, "parent menu not found, skipping entry"
                            );
                            summary.skipped += 1;
                            continue;
                        }
                    },
                };

                let menu = self
                    .menus
                    .create_menu(NewMenu {
                        slug: template.slug.clone(),
                        title: template.title.clone(),
                        path: template.path.clone(),
                        tier: *tier,
                        parent_id,
                        permission: template.permission.clone(),
                        sort_order: template.sort_order,
                    })
                    .await
                    .map_err(creation_failed("menu", &template.slug))?;
                menu_ids.insert(template.slug.as_str(), menu.menu_id);
                summary.created += 1;
            }
        }

        Ok(summary)
    }
}
