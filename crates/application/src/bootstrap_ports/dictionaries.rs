use async_trait::async_trait;
use uuid::Uuid;

use groundwork_core::AppResult;
use groundwork_domain::DictionaryItemTemplate;

/// Persisted dictionary with its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryRecord {
    /// Stable dictionary identifier.
    pub dictionary_id: Uuid,
    /// Unique dictionary code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Entries ordered by sort position.
    pub items: Vec<DictionaryItemTemplate>,
}

/// Input for dictionary creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDictionary {
    /// Unique dictionary code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Entries.
    pub items: Vec<DictionaryItemTemplate>,
}

/// Repository port for dictionaries.
#[async_trait]
pub trait DictionaryRepository: Send + Sync {
    /// Counts all dictionaries.
    async fn count_dictionaries(&self) -> AppResult<u64>;

    /// Finds a dictionary by code.
    async fn find_dictionary_by_code(&self, code: &str) -> AppResult<Option<DictionaryRecord>>;

    /// Creates a dictionary together with its entries.
    async fn create_dictionary(&self, dictionary: NewDictionary) -> AppResult<DictionaryRecord>;

    /// Lists all dictionaries ordered by code.
    async fn list_dictionaries(&self) -> AppResult<Vec<DictionaryRecord>>;
}
