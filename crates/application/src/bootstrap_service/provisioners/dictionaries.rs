use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use groundwork_core::AppResult;
use groundwork_domain::BootstrapStep;

use crate::bootstrap_ports::{DictionaryRepository, NewDictionary};

use super::super::context::BootstrapContext;
use super::super::guard::GuardDecision;
use super::{ProvisionSummary, Provisioner, creation_failed};

pub(super) struct DictionaryProvisioner {
    dictionaries: Arc<dyn DictionaryRepository>,
}

impl DictionaryProvisioner {
    pub(super) fn new(dictionaries: Arc<dyn DictionaryRepository>) -> Self {
        Self { dictionaries }
    }
}

#[async_trait]
impl Provisioner for DictionaryProvisioner {
    async fn check(&self, context: &BootstrapContext) -> AppResult<ProvisionSummary> {
        let existing = self.dictionaries.count_dictionaries().await?;
        let mut summary = ProvisionSummary::default();
        if GuardDecision::for_count(BootstrapStep::Dictionaries, existing)
            != GuardDecision::Provision
        {
            info!(component = "dictionaries", existing, "dictionaries already present, skipping");
            summary.skipped = context.loader().dictionaries().len();
            return Ok(summary);
        }

        for template in context.loader().dictionaries() {
            if self
                .dictionaries
                .find_dictionary_by_code(&template.code)
                .await?
                .is_some()
            {
                summary.skipped += 1;
                continue;
            }

            self.dictionaries
                .create_dictionary(NewDictionary {
                    code: template.code.clone(),
                    name: template.name.clone(),
                    description: template.description.clone(),
                    items: template.items.clone(),
                })
                .await
                .map_err(creation_failed("dictionary", &template.code))?;
            summary.created += 1;
        }

        Ok(summary)
    }
}
