use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use groundwork_application::{
    DictionaryRecord, DictionaryRepository, MenuRecord, MenuRepository, NewDictionary, NewMenu,
    NewOrganization, OptionRecord, OptionRepository, OrganizationRecord, OrganizationRepository,
};
use groundwork_core::{AppError, AppResult, TenantId};
use groundwork_domain::{DictionaryItemTemplate, UserId};

use super::{PostgresBootstrapStore, insert_error, row_count};

#[derive(Debug, FromRow)]
struct MenuRow {
    id: Uuid,
    slug: String,
    title: String,
    path: String,
    tier: String,
    parent_id: Option<Uuid>,
    permission: Option<String>,
    sort_order: i32,
}

impl TryFrom<MenuRow> for MenuRecord {
    type Error = AppError;

    fn try_from(row: MenuRow) -> Result<Self, Self::Error> {
        Ok(Self {
            menu_id: row.id,
            tier: row.tier.parse()?,
            slug: row.slug,
            title: row.title,
            path: row.path,
            parent_id: row.parent_id,
            permission: row.permission,
            sort_order: row.sort_order,
        })
    }
}

#[derive(Debug, FromRow)]
struct OptionRow {
    scope_id: Uuid,
    key: String,
    value: String,
    updated_at: DateTime<Utc>,
}

impl From<OptionRow> for OptionRecord {
    fn from(row: OptionRow) -> Self {
        Self {
            tenant_id: (!row.scope_id.is_nil()).then(|| TenantId::from_uuid(row.scope_id)),
            key: row.key,
            value: row.value,
            updated_at: row.updated_at,
        }
    }
}

/// Global options are stored under the nil UUID.
fn scope_id(tenant_id: Option<TenantId>) -> Uuid {
    tenant_id.map_or_else(Uuid::nil, |tenant_id| tenant_id.as_uuid())
}

#[derive(Debug, FromRow)]
struct DictionaryRow {
    id: Uuid,
    code: String,
    name: String,
    description: String,
}

#[derive(Debug, FromRow)]
struct DictionaryItemRow {
    dictionary_id: Uuid,
    label: String,
    value: String,
    sort_order: i32,
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    id: Uuid,
    tenant_id: Uuid,
    code: String,
    name: String,
    kind: String,
    parent_id: Option<Uuid>,
    leader_id: Option<Uuid>,
}

impl TryFrom<OrganizationRow> for OrganizationRecord {
    type Error = AppError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            organization_id: row.id,
            tenant_id: TenantId::from_uuid(row.tenant_id),
            kind: row.kind.parse()?,
            code: row.code,
            name: row.name,
            parent_id: row.parent_id,
            leader_id: row.leader_id.map(UserId::from_uuid),
        })
    }
}

#[async_trait]
impl MenuRepository for PostgresBootstrapStore {
    async fn count_menus(&self) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM menus")
            .fetch_one(&self.pool)
            .await
            .map(row_count)
            .map_err(|error| AppError::Internal(format!("failed to count menus: {error}")))
    }

    async fn find_menu_by_slug(&self, slug: &str) -> AppResult<Option<MenuRecord>> {
        sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, slug, title, path, tier, parent_id, permission, sort_order
            FROM menus
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find menu '{slug}': {error}")))?
        .map(MenuRecord::try_from)
        .transpose()
    }

    async fn create_menu(&self, menu: NewMenu) -> AppResult<MenuRecord> {
        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            INSERT INTO menus (id, slug, title, path, tier, parent_id, permission, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, slug, title, path, tier, parent_id, permission, sort_order
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(menu.slug.as_str())
        .bind(menu.title.as_str())
        .bind(menu.path.as_str())
        .bind(menu.tier.as_str())
        .bind(menu.parent_id)
        .bind(menu.permission.as_deref())
        .bind(menu.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::NotFound(format!(
                    "parent of menu '{}' does not exist",
                    menu.slug
                ));
            }

            insert_error(error, &format!("menu '{}'", menu.slug))
        })?;

        MenuRecord::try_from(row)
    }

    async fn list_menus(&self) -> AppResult<Vec<MenuRecord>> {
        sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, slug, title, path, tier, parent_id, permission, sort_order
            FROM menus
            ORDER BY sort_order, slug
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list menus: {error}")))?
        .into_iter()
        .map(MenuRecord::try_from)
        .collect()
    }
}

#[async_trait]
impl OptionRepository for PostgresBootstrapStore {
    async fn count_options(&self, tenant_id: Option<TenantId>) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM options WHERE scope_id = $1")
            .bind(scope_id(tenant_id))
            .fetch_one(&self.pool)
            .await
            .map(row_count)
            .map_err(|error| AppError::Internal(format!("failed to count options: {error}")))
    }

    async fn find_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
    ) -> AppResult<Option<OptionRecord>> {
        let row = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT scope_id, key, value, updated_at
            FROM options
            WHERE scope_id = $1 AND key = $2
            "#,
        )
        .bind(scope_id(tenant_id))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find option '{key}': {error}")))?;

        Ok(row.map(OptionRecord::from))
    }

    async fn create_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
        value: &str,
    ) -> AppResult<OptionRecord> {
        sqlx::query_as::<_, OptionRow>(
            r#"
            INSERT INTO options (scope_id, key, value)
            VALUES ($1, $2, $3)
            RETURNING scope_id, key, value, updated_at
            "#,
        )
        .bind(scope_id(tenant_id))
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map(OptionRecord::from)
        .map_err(|error| insert_error(error, &format!("option '{key}'")))
    }

    async fn upsert_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
        value: &str,
    ) -> AppResult<OptionRecord> {
        sqlx::query_as::<_, OptionRow>(
            r#"
            INSERT INTO options (scope_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (scope_id, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            RETURNING scope_id, key, value, updated_at
            "#,
        )
        .bind(scope_id(tenant_id))
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map(OptionRecord::from)
        .map_err(|error| AppError::Internal(format!("failed to store option '{key}': {error}")))
    }

    async fn list_options(
        &self,
        tenant_id: Option<TenantId>,
        prefix: &str,
    ) -> AppResult<Vec<OptionRecord>> {
        let rows = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT scope_id, key, value, updated_at
            FROM options
            WHERE scope_id = $1 AND starts_with(key, $2)
            ORDER BY key
            "#,
        )
        .bind(scope_id(tenant_id))
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list options: {error}")))?;

        Ok(rows.into_iter().map(OptionRecord::from).collect())
    }
}

impl PostgresBootstrapStore {
    async fn dictionary_items(
        &self,
        dictionary_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<DictionaryItemTemplate>>> {
        let rows = sqlx::query_as::<_, DictionaryItemRow>(
            r#"
            SELECT dictionary_id, label, value, sort_order
            FROM dictionary_items
            WHERE dictionary_id = ANY($1)
            ORDER BY dictionary_id, sort_order, value
            "#,
        )
        .bind(dictionary_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load dictionary items: {error}"))
        })?;

        let mut items: HashMap<Uuid, Vec<DictionaryItemTemplate>> = HashMap::new();
        for row in rows {
            items
                .entry(row.dictionary_id)
                .or_default()
                .push(DictionaryItemTemplate {
                    label: row.label,
                    value: row.value,
                    sort_order: row.sort_order,
                });
        }

        Ok(items)
    }

    async fn attach_items(&self, rows: Vec<DictionaryRow>) -> AppResult<Vec<DictionaryRecord>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut items = self.dictionary_items(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| DictionaryRecord {
                items: items.remove(&row.id).unwrap_or_default(),
                dictionary_id: row.id,
                code: row.code,
                name: row.name,
                description: row.description,
            })
            .collect())
    }
}

#[async_trait]
impl DictionaryRepository for PostgresBootstrapStore {
    async fn count_dictionaries(&self) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM dictionaries")
            .fetch_one(&self.pool)
            .await
            .map(row_count)
            .map_err(|error| AppError::Internal(format!("failed to count dictionaries: {error}")))
    }

    async fn find_dictionary_by_code(&self, code: &str) -> AppResult<Option<DictionaryRecord>> {
        let row = sqlx::query_as::<_, DictionaryRow>(
            r#"
            SELECT id, code, name, description
            FROM dictionaries
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find dictionary '{code}': {error}"))
        })?;

        match row {
            Some(row) => Ok(self.attach_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_dictionary(&self, dictionary: NewDictionary) -> AppResult<DictionaryRecord> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let dictionary_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO dictionaries (id, code, name, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(dictionary_id)
        .bind(dictionary.code.as_str())
        .bind(dictionary.name.as_str())
        .bind(dictionary.description.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| insert_error(error, &format!("dictionary '{}'", dictionary.code)))?;

        let mut items = dictionary.items;
        items.sort_by(|left, right| {
            left.sort_order
                .cmp(&right.sort_order)
                .then_with(|| left.value.cmp(&right.value))
        });
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO dictionary_items (dictionary_id, label, value, sort_order)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(dictionary_id)
            .bind(item.label.as_str())
            .bind(item.value.as_str())
            .bind(item.sort_order)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                insert_error(
                    error,
                    &format!("item '{}' of dictionary '{}'", item.value, dictionary.code),
                )
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit dictionary transaction: {error}"))
        })?;

        Ok(DictionaryRecord {
            dictionary_id,
            code: dictionary.code,
            name: dictionary.name,
            description: dictionary.description,
            items,
        })
    }

    async fn list_dictionaries(&self) -> AppResult<Vec<DictionaryRecord>> {
        let rows = sqlx::query_as::<_, DictionaryRow>(
            r#"
            SELECT id, code, name, description
            FROM dictionaries
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list dictionaries: {error}")))?;

        self.attach_items(rows).await
    }
}

#[async_trait]
impl OrganizationRepository for PostgresBootstrapStore {
    async fn count_organizations(&self, tenant_id: TenantId) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM organizations WHERE tenant_id = $1")
            .bind(tenant_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map(row_count)
            .map_err(|error| {
                AppError::Internal(format!("failed to count organizations: {error}"))
            })
    }

    async fn find_organization_by_code(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> AppResult<Option<OrganizationRecord>> {
        sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, tenant_id, code, name, kind, parent_id, leader_id
            FROM organizations
            WHERE tenant_id = $1 AND code = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find organization '{code}': {error}"))
        })?
        .map(OrganizationRecord::try_from)
        .transpose()
    }

    async fn create_organization(
        &self,
        organization: NewOrganization,
    ) -> AppResult<OrganizationRecord> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organizations (id, tenant_id, code, name, kind, parent_id, leader_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, tenant_id, code, name, kind, parent_id, leader_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization.tenant_id.as_uuid())
        .bind(organization.code.as_str())
        .bind(organization.name.as_str())
        .bind(organization.kind.as_str())
        .bind(organization.parent_id)
        .bind(organization.leader_id.map(|leader_id| leader_id.as_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| insert_error(error, &format!("organization '{}'", organization.code)))?;

        OrganizationRecord::try_from(row)
    }

    async fn list_organizations(&self, tenant_id: TenantId) -> AppResult<Vec<OrganizationRecord>> {
        sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, tenant_id, code, name, kind, parent_id, leader_id
            FROM organizations
            WHERE tenant_id = $1
            ORDER BY code
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list organizations: {error}")))?
        .into_iter()
        .map(OrganizationRecord::try_from)
        .collect()
    }
}
