//! Integration tests for the Tenant and User repositories.

use vows_core::VowsError;
use vows_core::models::planner::CreatePlanner;
use vows_core::models::tenant::CreateTenant;
use vows_core::models::user::{CreateUser, UpdateUser, UserFilter, UserRole};
use vows_core::repository::{
    PageRepository, Pagination, PlannerRepository, TenantRepository, UserRepository,
};
use vows_core::template;
use vows_db::repository::{
    SurrealPageRepository, SurrealPlannerRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> (Surreal<Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vows_db::run_migrations(&db).await.unwrap();

    let tenant = SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: "Ada & Grace".into(),
            metadata: None,
        })
        .await
        .unwrap();

    (db, tenant.id)
}

fn new_user(tenant_id: Uuid, email: &str) -> CreateUser {
    CreateUser {
        tenant_id,
        email: email.into(),
        name: email.split('@').next().unwrap_or_default().into(),
        role: UserRole::Member,
        is_test_account: false,
        email_opt_in: true,
    }
}

#[tokio::test]
async fn tenant_create_and_get() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo.get_by_id(tenant_id).await.unwrap();
    assert_eq!(tenant.name, "Ada & Grace");
}

#[tokio::test]
async fn tenant_delete_removes_owned_records() {
    let (db, tenant_id) = setup().await;
    let other_tenant = SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: "Other".into(),
            metadata: None,
        })
        .await
        .unwrap()
        .id;

    let planners = SurrealPlannerRepository::new(db.clone());
    let pages = SurrealPageRepository::new(db.clone());
    let users = SurrealUserRepository::new(db.clone());

    let mut planner_ids = Vec::new();
    for tenant in [tenant_id, other_tenant] {
        let planner = planners
            .create(CreatePlanner {
                tenant_id: tenant,
                title: "Our Wedding".into(),
            })
            .await
            .unwrap();
        for page in template::seed_pages(planner.id) {
            pages.create(page).await.unwrap();
        }
        planner_ids.push(planner.id);
    }
    let ada = users.create(new_user(tenant_id, "ada@example.com")).await.unwrap();
    let bob = users.create(new_user(other_tenant, "bob@example.com")).await.unwrap();

    SurrealTenantRepository::new(db.clone())
        .delete(tenant_id)
        .await
        .unwrap();

    let tenants = SurrealTenantRepository::new(db);
    assert!(matches!(
        tenants.get_by_id(tenant_id).await,
        Err(VowsError::NotFound { .. })
    ));
    assert!(matches!(
        planners.get_by_tenant(tenant_id).await,
        Err(VowsError::NotFound { .. })
    ));
    assert!(pages.list_by_planner(planner_ids[0]).await.unwrap().is_empty());
    assert!(matches!(
        users.get_by_id(ada.id).await,
        Err(VowsError::NotFound { .. })
    ));

    assert!(tenants.get_by_id(other_tenant).await.is_ok());
    assert!(!pages.list_by_planner(planner_ids[1]).await.unwrap().is_empty());
    assert!(users.get_by_id(bob.id).await.is_ok());
}

#[tokio::test]
async fn create_and_get_user_by_email_case_insensitive() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user(tenant_id, "Ada@Example.com"))
        .await
        .unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.role, UserRole::Member);
    assert!(!user.is_deleted());

    let fetched = repo.get_by_email("ADA@example.COM").await.unwrap();
    assert_eq!(fetched.id, user.id);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(new_user(tenant_id, "ada@example.com"))
        .await
        .unwrap();
    let err = repo
        .create(new_user(tenant_id, "ada@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, VowsError::AlreadyExists { .. }));
}

#[tokio::test]
async fn update_user_flags() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user(tenant_id, "ada@example.com"))
        .await
        .unwrap();
    let updated = repo
        .update(
            user.id,
            UpdateUser {
                is_test_account: Some(true),
                email_opt_in: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_test_account);
    assert!(!updated.email_opt_in);
    assert_eq!(updated.name, "ada");
}

#[tokio::test]
async fn soft_delete_keeps_first_timestamp() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user(tenant_id, "ada@example.com"))
        .await
        .unwrap();
    let deleted = repo.soft_delete(user.id).await.unwrap();
    assert!(deleted.is_deleted());

    let again = repo.soft_delete(user.id).await.unwrap();
    assert_eq!(again.deleted_at, deleted.deleted_at);
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    for email in ["ada@example.com", "grace@example.com", "alan@test.org"] {
        repo.create(new_user(tenant_id, email)).await.unwrap();
    }
    let tester = repo
        .create(new_user(tenant_id, "qa@example.com"))
        .await
        .unwrap();
    repo.update(
        tester.id,
        UpdateUser {
            is_test_account: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let gone = repo
        .create(new_user(tenant_id, "gone@example.com"))
        .await
        .unwrap();
    repo.soft_delete(gone.id).await.unwrap();

    let everyone = repo
        .list(
            &UserFilter {
                include_test_accounts: true,
                include_deleted: true,
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(everyone.total, 5);

    let real = repo
        .list(&UserFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(real.total, 3);

    let example = repo
        .list(
            &UserFilter {
                email_contains: Some("example.com".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(example.total, 2);

    let page = repo
        .list(
            &UserFilter::default(),
            Pagination {
                offset: 1,
                limit: 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 3);
}
