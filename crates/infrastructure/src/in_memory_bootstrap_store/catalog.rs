use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use groundwork_application::{
    DictionaryRecord, DictionaryRepository, MenuRecord, MenuRepository, NewDictionary, NewMenu,
    NewOrganization, OptionRecord, OptionRepository, OrganizationRecord, OrganizationRepository,
};
use groundwork_core::{AppError, AppResult, TenantId};

use super::InMemoryBootstrapStore;

#[async_trait]
impl MenuRepository for InMemoryBootstrapStore {
    async fn count_menus(&self) -> AppResult<u64> {
        Ok(self.menus.read().await.len() as u64)
    }

    async fn find_menu_by_slug(&self, slug: &str) -> AppResult<Option<MenuRecord>> {
        Ok(self
            .menus
            .read()
            .await
            .iter()
            .find(|menu| menu.slug == slug)
            .cloned())
    }

    async fn create_menu(&self, menu: NewMenu) -> AppResult<MenuRecord> {
        let mut menus = self.menus.write().await;
        if menus.iter().any(|stored| stored.slug == menu.slug) {
            return Err(AppError::Conflict(format!(
                "menu '{}' already exists",
                menu.slug
            )));
        }
        if let Some(parent_id) = menu.parent_id
            && !menus.iter().any(|stored| stored.menu_id == parent_id)
        {
            return Err(AppError::NotFound(format!(
                "parent menu '{parent_id}' not found"
            )));
        }

        let record = MenuRecord {
            menu_id: Uuid::new_v4(),
            slug: menu.slug,
            title: menu.title,
            path: menu.path,
            tier: menu.tier,
            parent_id: menu.parent_id,
            permission: menu.permission,
            sort_order: menu.sort_order,
        };
        menus.push(record.clone());
        Ok(record)
    }

    async fn list_menus(&self) -> AppResult<Vec<MenuRecord>> {
        let mut menus = self.menus.read().await.clone();
        menus.sort_by(|left, right| {
            (left.tier, left.sort_order, left.slug.as_str()).cmp(&(
                right.tier,
                right.sort_order,
                right.slug.as_str(),
            ))
        });
        Ok(menus)
    }
}

#[async_trait]
impl OptionRepository for InMemoryBootstrapStore {
    async fn count_options(&self, tenant_id: Option<TenantId>) -> AppResult<u64> {
        Ok(self
            .options
            .read()
            .await
            .keys()
            .filter(|(scope, _)| *scope == tenant_id)
            .count() as u64)
    }

    async fn find_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
    ) -> AppResult<Option<OptionRecord>> {
        Ok(self
            .options
            .read()
            .await
            .get(&(tenant_id, key.to_owned()))
            .cloned())
    }

    async fn create_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
        value: &str,
    ) -> AppResult<OptionRecord> {
        let mut options = self.options.write().await;
        let map_key = (tenant_id, key.to_owned());
        if options.contains_key(&map_key) {
            return Err(AppError::Conflict(format!("option '{key}' already exists")));
        }

        let record = OptionRecord {
            tenant_id,
            key: key.to_owned(),
            value: value.to_owned(),
            updated_at: Utc::now(),
        };
        options.insert(map_key, record.clone());
        Ok(record)
    }

    async fn upsert_option(
        &self,
        tenant_id: Option<TenantId>,
        key: &str,
        value: &str,
    ) -> AppResult<OptionRecord> {
        let record = OptionRecord {
            tenant_id,
            key: key.to_owned(),
            value: value.to_owned(),
            updated_at: Utc::now(),
        };
        self.options
            .write()
            .await
            .insert((tenant_id, key.to_owned()), record.clone());
        Ok(record)
    }

    async fn list_options(
        &self,
        tenant_id: Option<TenantId>,
        prefix: &str,
    ) -> AppResult<Vec<OptionRecord>> {
        Ok(self
            .options
            .read()
            .await
            .values()
            .filter(|option| option.tenant_id == tenant_id && option.key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DictionaryRepository for InMemoryBootstrapStore {
    async fn count_dictionaries(&self) -> AppResult<u64> {
        Ok(self.dictionaries.read().await.len() as u64)
    }

    async fn find_dictionary_by_code(&self, code: &str) -> AppResult<Option<DictionaryRecord>> {
        Ok(self.dictionaries.read().await.get(code).cloned())
    }

    async fn create_dictionary(&self, dictionary: NewDictionary) -> AppResult<DictionaryRecord> {
        let mut dictionaries = self.dictionaries.write().await;
        if dictionaries.contains_key(&dictionary.code) {
            return Err(AppError::Conflict(format!(
                "dictionary '{}' already exists",
                dictionary.code
            )));
        }

        let mut items = dictionary.items;
        items.sort_by_key(|item| item.sort_order);
        let record = DictionaryRecord {
            dictionary_id: Uuid::new_v4(),
            code: dictionary.code,
            name: dictionary.name,
            description: dictionary.description,
            items,
        };
        dictionaries.insert(record.code.clone(), record.clone());
        Ok(record)
    }

    async fn list_dictionaries(&self) -> AppResult<Vec<DictionaryRecord>> {
        Ok(self.dictionaries.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryBootstrapStore {
    async fn count_organizations(&self, tenant_id: TenantId) -> AppResult<u64> {
        Ok(self
            .organizations
            .read()
            .await
            .iter()
            .filter(|organization| organization.tenant_id == tenant_id)
            .count() as u64)
    }

    async fn find_organization_by_code(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> AppResult<Option<OrganizationRecord>> {
        Ok(self
            .organizations
            .read()
            .await
            .iter()
            .find(|organization| organization.tenant_id == tenant_id && organization.code == code)
            .cloned())
    }

    async fn create_organization(
        &self,
        organization: NewOrganization,
    ) -> AppResult<OrganizationRecord> {
        let mut organizations = self.organizations.write().await;
        if organizations.iter().any(|stored| {
            stored.tenant_id == organization.tenant_id && stored.code == organization.code
        }) {
            return Err(AppError::Conflict(format!(
                "organization '{}' already exists",
                organization.code
            )));
        }

        let record = OrganizationRecord {
            organization_id: Uuid::new_v4(),
            tenant_id: organization.tenant_id,
            code: organization.code,
            name: organization.name,
            kind: organization.kind,
            parent_id: organization.parent_id,
            leader_id: organization.leader_id,
        };
        organizations.push(record.clone());
        Ok(record)
    }

    async fn list_organizations(&self, tenant_id: TenantId) -> AppResult<Vec<OrganizationRecord>> {
        Ok(self
            .organizations
            .read()
            .await
            .iter()
            .filter(|organization| organization.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}
