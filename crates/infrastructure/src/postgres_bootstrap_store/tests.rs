use groundwork_application::{
    DictionaryRepository, NewDictionary, NewEmployee, NewRole, NewTenant, NewUser,
    OptionRepository, PolicyFilter, PolicyRepository, RoleRepository, TenantRepository,
    UserRepository, UserRoleBinding,
};
use groundwork_core::{AppError, TenantId};
use groundwork_domain::{DictionaryItemTemplate, PolicyTuple, PolicyType};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresBootstrapStore;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres bootstrap tests: {error}");
    }

    Some(pool)
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn create_tenant(store: &PostgresBootstrapStore) -> TenantId {
    let tenant = store
        .create_tenant(NewTenant {
            slug: unique("tenant"),
            name: "Test Tenant".to_owned(),
            description: String::new(),
            parent_id: None,
        })
        .await;

    match tenant {
        Ok(tenant) => tenant.tenant_id,
        Err(error) => panic!("failed to create tenant: {error}"),
    }
}

#[tokio::test]
async fn duplicate_role_slug_maps_to_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresBootstrapStore::new(pool);
    let role = NewRole {
        slug: unique("role"),
        name: "Reviewer".to_owned(),
        disabled: false,
        description: String::new(),
    };

    assert!(store.create_role(role.clone()).await.is_ok());
    assert!(matches!(
        store.create_role(role.clone()).await,
        Err(AppError::Conflict(_))
    ));
    assert!(
        store
            .find_role_by_slug(role.slug.as_str())
            .await
            .is_ok_and(|found| found.is_some_and(|found| found.name == "Reviewer"))
    );
}

#[tokio::test]
async fn employees_link_to_their_manager() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresBootstrapStore::new(pool);
    let tenant_id = create_tenant(&store).await;
    let new_user = |username: String| NewUser {
        email: format!("{username}@example.com"),
        display_name: username.clone(),
        username,
        password_hash: "hash".to_owned(),
        tenant_id,
    };

    let (Ok(manager), Ok(report)) = (
        store.create_user(new_user(unique("manager"))).await,
        store.create_user(new_user(unique("report"))).await,
    ) else {
        panic!("users should be created");
    };

    let employee = store
        .create_employee(NewEmployee {
            user_id: report.user_id,
            tenant_id,
            employee_number: unique("E"),
            department: Some("engineering".to_owned()),
            position: "Developer".to_owned(),
        })
        .await;
    let Ok(employee) = employee else {
        panic!("employee should be created");
    };
    assert!(employee.manager_id.is_none());

    assert!(
        store
            .set_employee_manager(employee.employee_id, manager.user_id)
            .await
            .is_ok()
    );
    let stored = store.find_employee_by_user(report.user_id).await;
    assert_eq!(
        stored.ok().flatten().and_then(|employee| employee.manager_id),
        Some(manager.user_id)
    );

    let binding = UserRoleBinding {
        user_id: report.user_id,
        role_slug: {
            let slug = unique("role");
            let created = store
                .create_role(NewRole {
                    slug: slug.clone(),
                    name: slug.clone(),
                    disabled: false,
                    description: String::new(),
                })
                .await;
            assert!(created.is_ok());
            slug
        },
        tenant_id,
    };
    assert!(store.bind_role(binding.clone()).await.is_ok());
    assert!(store.bind_role(binding.clone()).await.is_ok());
    assert_eq!(
        store.list_role_bindings(Some(report.user_id)).await,
        Ok(vec![binding])
    );
}

#[tokio::test]
async fn global_and_tenant_options_do_not_collide() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresBootstrapStore::new(pool);
    let tenant_id = create_tenant(&store).await;
    let key = unique("test.option");

    assert!(store.create_option(None, key.as_str(), "global").await.is_ok());
    assert!(
        store
            .create_option(Some(tenant_id), key.as_str(), "tenant")
            .await
            .is_ok()
    );
    assert!(
        store
            .upsert_option(None, key.as_str(), "updated")
            .await
            .is_ok()
    );

    let global = store.find_option(None, key.as_str()).await.ok().flatten();
    assert_eq!(global.as_ref().map(|option| option.value.as_str()), Some("updated"));
    assert_eq!(global.and_then(|option| option.tenant_id), None);

    let scoped = store.list_options(Some(tenant_id), "test.option").await;
    assert!(scoped.is_ok_and(|options| {
        options.len() == 1 && options[0].tenant_id == Some(tenant_id)
    }));
}

#[tokio::test]
async fn dictionary_items_keep_their_order() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresBootstrapStore::new(pool);
    let code = unique("status");
    let item = |label: &str, value: &str, sort_order| DictionaryItemTemplate {
        label: label.to_owned(),
        value: value.to_owned(),
        sort_order,
    };

    let created = store
        .create_dictionary(NewDictionary {
            code: code.clone(),
            name: "Status".to_owned(),
            description: String::new(),
            items: vec![item("Closed", "closed", 2), item("Open", "open", 1)],
        })
        .await;
    assert!(created.is_ok());

    let stored = store.find_dictionary_by_code(code.as_str()).await.ok().flatten();
    let values: Vec<String> = stored
        .map(|dictionary| dictionary.items.into_iter().map(|item| item.value).collect())
        .unwrap_or_default();
    assert_eq!(values, vec!["open".to_owned(), "closed".to_owned()]);
}

#[tokio::test]
async fn policies_are_matched_on_every_field() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresBootstrapStore::new(pool);
    let subject = unique("subject");
    let read = PolicyTuple::policy(subject.as_str(), "*", "/content/posts", "GET");
    let write = PolicyTuple::policy(subject.as_str(), "*", "/content/posts", "POST");

    assert!(store.create_policy(read.clone()).await.is_ok());
    assert!(store.find_policy(&read).await.is_ok_and(|found| found.is_some()));
    assert!(store.find_policy(&write).await.is_ok_and(|found| found.is_none()));

    let filter = PolicyFilter::of_type(PolicyType::Policy).with_subject(subject.as_str());
    assert_eq!(store.count_policies(&filter).await, Ok(1));
    assert!(
        store
            .list_policies(&filter)
            .await
            .is_ok_and(|policies| policies.len() == 1 && policies[0].tuple == read)
    );
}
