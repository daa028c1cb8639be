//! Integration tests for the admin console and inspiration board.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use vows_auth::Session;
use vows_core::error::VowsError;
use vows_core::models::palette::UpdatePalette;
use vows_core::models::spark::UpdateSpark;
use vows_core::models::tenant::CreateTenant;
use vows_core::models::user::{CreateUser, User, UserFilter, UserRole};
use vows_core::repository::{Pagination, TenantRepository, UserRepository};
use vows_db::repository::{
    SurrealPaletteRepository, SurrealSparkRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use vows_planner::board::NewSpark;
use vows_planner::{AdminService, BoardService};

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

async fn user(db: &Surreal<Db>, tenant_id: Uuid, email: &str, role: UserRole) -> User {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            tenant_id,
            email: email.into(),
            name: email.into(),
            role,
            is_test_account: false,
            email_opt_in: false,
        })
        .await
        .unwrap()
}

fn session_of(user: &User) -> Session {
    Session {
        user_id: user.id,
        tenant_id: user.tenant_id,
        role: user.role,
    }
}

fn spark(url: &str) -> NewSpark {
    NewSpark {
        image_url: url.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn admin_operations_require_admin_role() {
    let (db, tenant_id) = setup().await;
    let member = user(&db, tenant_id, "member@example.com", UserRole::Member).await;
    let admin = AdminService::new(SurrealUserRepository::new(db));
    let session = session_of(&member);

    let err = admin
        .list_users(&session, &UserFilter::default(), Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VowsError::AuthorizationDenied { .. }));
    assert!(admin.export_csv(&session, &UserFilter::default()).await.is_err());
    assert!(admin.soft_delete(&session, Uuid::new_v4()).await.is_err());
}

#[tokio::test]
async fn admin_lists_exports_and_deletes() {
    let (db, tenant_id) = setup().await;
    let boss = user(&db, tenant_id, "boss@example.com", UserRole::Admin).await;
    let ada = user(&db, tenant_id, "ada@example.com", UserRole::Member).await;
    user(&db, tenant_id, "grace@test.org", UserRole::Member).await;
    let admin = AdminService::new(SurrealUserRepository::new(db));
    let session = session_of(&boss);

    let listed = admin
        .list_users(
            &session,
            &UserFilter {
                email_contains: Some("EXAMPLE".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(listed.total, 2);

    let csv = String::from_utf8(admin.export_csv(&session, &UserFilter::default()).await.unwrap())
        .unwrap();
    assert!(csv.starts_with("id,email,name,role,tenant_id,is_test_account,email_opt_in,deleted,created_at"));
    assert_eq!(csv.lines().count(), 4);

    let deleted = admin.soft_delete(&session, ada.id).await.unwrap();
    let again = admin.soft_delete(&session, ada.id).await.unwrap();
    assert_eq!(deleted.deleted_at, again.deleted_at);

    let err = admin.soft_delete(&session, boss.id).await.unwrap_err();
    assert!(matches!(err, VowsError::Validation { .. }));

    let flagged = admin
        .set_test_account(&session, ada.id, true)
        .await
        .unwrap();
    assert!(flagged.is_test_account);
}

#[tokio::test]
async fn deleting_palette_unfiles_sparks() {
    let (db, tenant_id) = setup().await;
    let board = BoardService::new(
        SurrealPaletteRepository::new(db.clone()),
        SurrealSparkRepository::new(db),
    );

    let palette = board
        .create_palette(tenant_id, "  Florals ", None)
        .await
        .unwrap();
    assert_eq!(palette.name, "Florals");

    let filed = board
        .create_spark(
            tenant_id,
            NewSpark {
                palette_id: Some(palette.id),
                tags: vec!["#Peony".into(), "peony".into()],
                ..spark("https://img.example/peony.jpg")
            },
        )
        .await
        .unwrap();
    assert_eq!(filed.tags, ["peony"]);

    board.delete_palette(tenant_id, palette.id).await.unwrap();
    assert!(board.list_palettes(tenant_id).await.unwrap().is_empty());

    let all = board.list_sparks(tenant_id, None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].palette_id, None);
}

#[tokio::test]
async fn sparks_validate_urls_and_palette_ownership() {
    let (db, tenant_id) = setup().await;
    let other_tenant = SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: "Other".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let board = BoardService::new(
        SurrealPaletteRepository::new(db.clone()),
        SurrealSparkRepository::new(db),
    );

    let err = board
        .create_spark(tenant_id, spark("ftp://img.example/a.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, VowsError::Validation { .. }));

    let foreign = board
        .create_palette(other_tenant.id, "Theirs", None)
        .await
        .unwrap();
    let loose = board
        .create_spark(tenant_id, spark("https://img.example/a.jpg"))
        .await
        .unwrap();

    let err = board
        .update_spark(
            tenant_id,
            loose.id,
            UpdateSpark {
                palette_id: Some(Some(foreign.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VowsError::NotFound { .. }));

    let mine = board.create_palette(tenant_id, "Mine", None).await.unwrap();
    let moved = board
        .update_spark(
            tenant_id,
            loose.id,
            UpdateSpark {
                palette_id: Some(Some(mine.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.palette_id, Some(mine.id));

    let unfiled = board
        .update_spark(
            tenant_id,
            loose.id,
            UpdateSpark {
                palette_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(unfiled.palette_id, None);

    let renamed = board
        .update_palette(
            tenant_id,
            mine.id,
            UpdatePalette {
                name: Some("Ours".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Ours");

    board.delete_spark(tenant_id, loose.id).await.unwrap();
    assert!(board.delete_spark(tenant_id, loose.id).await.is_err());
}
