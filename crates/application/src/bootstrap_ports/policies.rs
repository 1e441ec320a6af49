use async_trait::async_trait;
use uuid::Uuid;

use groundwork_core::AppResult;
use groundwork_domain::{PolicyTuple, PolicyType};

/// Persisted authorization tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRecord {
    /// Row identifier. Uniqueness is carried by the tuple, not the store.
    pub policy_id: Uuid,
    /// Tuple values.
    pub tuple: PolicyTuple,
}

/// Filter for counting and listing tuples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyFilter {
    /// Tuple type.
    pub ptype: Option<PolicyType>,
    /// First value, the subject of `p` rows and the child of `g` rows.
    pub subject: Option<String>,
}

impl PolicyFilter {
    /// Matches every tuple.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches tuples of one type.
    #[must_use]
    pub fn of_type(ptype: PolicyType) -> Self {
        Self {
            ptype: Some(ptype),
            subject: None,
        }
    }

    /// Restricts the filter to one subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Returns whether a tuple passes the filter.
    #[must_use]
    pub fn matches(&self, tuple: &PolicyTuple) -> bool {
        self.ptype.is_none_or(|ptype| ptype == tuple.ptype)
            && self
                .subject
                .as_deref()
                .is_none_or(|subject| subject == tuple.v0)
    }
}

/// Repository port for the authorization tuple store.
///
/// The store does not enforce uniqueness. Callers look a tuple up before
/// inserting it.
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Counts tuples matching a filter.
    async fn count_policies(&self, filter: &PolicyFilter) -> AppResult<u64>;

    /// Finds a tuple by its six values and type.
    async fn find_policy(&self, tuple: &PolicyTuple) -> AppResult<Option<PolicyRecord>>;

    /// Inserts a tuple.
    async fn create_policy(&self, tuple: PolicyTuple) -> AppResult<PolicyRecord>;

    /// Lists tuples matching a filter in insertion order.
    async fn list_policies(&self, filter: &PolicyFilter) -> AppResult<Vec<PolicyRecord>>;
}
