use async_trait::async_trait;
use uuid::Uuid;

use groundwork_application::{PolicyFilter, PolicyRecord, PolicyRepository};
use groundwork_core::AppResult;
use groundwork_domain::PolicyTuple;

use super::InMemoryBootstrapStore;

#[async_trait]
impl PolicyRepository for InMemoryBootstrapStore {
    async fn count_policies(&self, filter: &PolicyFilter) -> AppResult<u64> {
        Ok(self
            .policies
            .read()
            .await
            .iter()
            .filter(|policy| filter.matches(&policy.tuple))
            .count() as u64)
    }

    async fn find_policy(&self, tuple: &PolicyTuple) -> AppResult<Option<PolicyRecord>> {
        Ok(self
            .policies
            .read()
            .await
            .iter()
            .find(|policy| &policy.tuple == tuple)
            .cloned())
    }

    async fn create_policy(&self, tuple: PolicyTuple) -> AppResult<PolicyRecord> {
        let record = PolicyRecord {
            policy_id: Uuid::new_v4(),
            tuple,
        };
        self.policies.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_policies(&self, filter: &PolicyFilter) -> AppResult<Vec<PolicyRecord>> {
        Ok(self
            .policies
            .read()
            .await
            .iter()
            .filter(|policy| filter.matches(&policy.tuple))
            .cloned()
            .collect())
    }
}
