use async_trait::async_trait;
use uuid::Uuid;

use groundwork_core::AppResult;
use groundwork_domain::MenuTier;

/// Persisted menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRecord {
    /// Stable menu identifier.
    pub menu_id: Uuid,
    /// Unique menu key.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Route path.
    pub path: String,
    /// Navigation tier.
    pub tier: MenuTier,
    /// Parent entry.
    pub parent_id: Option<Uuid>,
    /// Permission name required to see the entry.
    pub permission: Option<String>,
    /// Sort position among siblings.
    pub sort_order: i32,
}

/// Input for menu creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenu {
    /// Unique menu key.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Route path.
    pub path: String,
    /// Navigation tier.
    pub tier: MenuTier,
    /// Parent entry.
    pub parent_id: Option<Uuid>,
    /// Permission name required to see the entry.
    pub permission: Option<String>,
    /// Sort position among siblings.
    pub sort_order: i32,
}

/// Repository port for navigation menus.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Counts all menu entries.
    async fn count_menus(&self) -> AppResult<u64>;

    /// Finds a menu entry by slug.
    async fn find_menu_by_slug(&self, slug: &str) -> AppResult<Option<MenuRecord>>;

    /// Creates a menu entry.
    async fn create_menu(&self, menu: NewMenu) -> AppResult<MenuRecord>;

    /// Lists all menu entries ordered by tier and sort order.
    async fn list_menus(&self) -> AppResult<Vec<MenuRecord>>;
}
