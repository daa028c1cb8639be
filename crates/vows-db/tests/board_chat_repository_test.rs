//! Integration tests for RSVP forms, the inspiration board and chat history.

use std::collections::BTreeMap;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use vows_core::VowsError;
use vows_core::models::chat::{ChatRole, CreateChatMessage};
use vows_core::models::palette::{CreatePalette, UpdatePalette};
use vows_core::models::rsvp::{CreateRsvpForm, UpdateRsvpForm};
use vows_core::models::spark::{CreateSpark, UpdateSpark};
use vows_core::models::tenant::CreateTenant;
use vows_core::repository::{
    ChatRepository, PaletteRepository, RsvpRepository, SparkRepository, TenantRepository,
};
use vows_db::repository::{
    SurrealChatRepository, SurrealPaletteRepository, SurrealRsvpRepository,
    SurrealSparkRepository, SurrealTenantRepository,
};

async fn setup() -> (Surreal<Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vows_db::run_migrations(&db).await.unwrap();

    let tenant = SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: "Test Couple".into(),
            metadata: None,
        })
        .await
        .unwrap();

    (db, tenant.id)
}

fn spark(tenant_id: Uuid, palette_id: Option<Uuid>) -> CreateSpark {
    CreateSpark {
        tenant_id,
        palette_id,
        image_url: "https://images.example.com/peony.jpg".into(),
        caption: Some("peonies".into()),
        source_url: None,
        tags: vec!["flowers".into()],
    }
}

#[tokio::test]
async fn rsvp_form_lifecycle() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealRsvpRepository::new(db);
    let page_id = Uuid::new_v4();

    let mut toggles = BTreeMap::new();
    toggles.insert("meal".to_string(), true);
    toggles.insert("phone".to_string(), false);

    let form = repo
        .create(CreateRsvpForm {
            tenant_id,
            page_id,
            slug: "ada-and-grace".into(),
            fields: toggles,
            meal_options: vec!["Fish".into(), "Vegan".into()],
        })
        .await
        .unwrap();
    assert!(form.asks("meal"));
    assert!(!form.asks("phone"));

    let by_slug = repo.get_by_slug("ada-and-grace").await.unwrap();
    assert_eq!(by_slug.id, form.id);
    assert_eq!(by_slug.meal_options, ["Fish", "Vegan"]);

    let by_page = repo.get_by_page(tenant_id, page_id).await.unwrap();
    assert_eq!(by_page.map(|f| f.id), Some(form.id));

    let updated = repo
        .update(
            tenant_id,
            form.id,
            UpdateRsvpForm {
                fields: None,
                meal_options: Some(vec!["Beef".into()]),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.meal_options, ["Beef"]);
    assert!(updated.asks("meal"));

    repo.delete_by_page(tenant_id, page_id).await.unwrap();
    assert!(repo.get_by_page(tenant_id, page_id).await.unwrap().is_none());
    let err = repo.get_by_slug("ada-and-grace").await.unwrap_err();
    assert!(matches!(err, VowsError::NotFound { .. }));
}

#[tokio::test]
async fn rsvp_form_is_one_per_page() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealRsvpRepository::new(db);
    let page_id = Uuid::new_v4();

    for slug in ["first", "second"] {
        let result = repo
            .create(CreateRsvpForm {
                tenant_id,
                page_id,
                slug: slug.into(),
                fields: BTreeMap::new(),
                meal_options: vec![],
            })
            .await;
        if slug == "second" {
            assert!(matches!(result, Err(VowsError::AlreadyExists { .. })));
        } else {
            result.unwrap();
        }
    }
}

#[tokio::test]
async fn palette_crud_and_unique_name() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealPaletteRepository::new(db);

    let palette = repo
        .create(CreatePalette {
            tenant_id,
            name: "Florals".into(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(palette.description, "");

    let err = repo
        .create(CreatePalette {
            tenant_id,
            name: "Florals".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, VowsError::AlreadyExists { .. }));

    let updated = repo
        .update(
            tenant_id,
            palette.id,
            UpdatePalette {
                description: Some("soft pinks".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "soft pinks");
    assert_eq!(repo.list(tenant_id).await.unwrap().len(), 1);

    repo.delete(tenant_id, palette.id).await.unwrap();
    assert!(repo.list(tenant_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn sparks_file_and_unfile() {
    let (db, tenant_id) = setup().await;
    let palettes = SurrealPaletteRepository::new(db.clone());
    let sparks = SurrealSparkRepository::new(db);

    let palette = palettes
        .create(CreatePalette {
            tenant_id,
            name: "Tables".into(),
            description: None,
        })
        .await
        .unwrap();

    let filed = sparks
        .create(spark(tenant_id, Some(palette.id)))
        .await
        .unwrap();
    let loose = sparks.create(spark(tenant_id, None)).await.unwrap();
    assert_eq!(filed.palette_id, Some(palette.id));
    assert_eq!(loose.palette_id, None);

    assert_eq!(sparks.list(tenant_id, None).await.unwrap().len(), 2);
    let in_palette = sparks.list(tenant_id, Some(palette.id)).await.unwrap();
    assert_eq!(in_palette.len(), 1);
    assert_eq!(in_palette[0].id, filed.id);

    let moved = sparks
        .update(
            tenant_id,
            loose.id,
            UpdateSpark {
                palette_id: Some(Some(palette.id)),
                caption: Some("linen".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.palette_id, Some(palette.id));
    assert_eq!(moved.caption, "linen");

    sparks.unfile_palette(tenant_id, palette.id).await.unwrap();
    assert!(
        sparks
            .list(tenant_id, Some(palette.id))
            .await
            .unwrap()
            .is_empty()
    );

    sparks.delete(tenant_id, filed.id).await.unwrap();
    let err = sparks.get_by_id(tenant_id, filed.id).await.unwrap_err();
    assert!(matches!(err, VowsError::NotFound { .. }));
}

#[tokio::test]
async fn chat_recent_is_chronological() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealChatRepository::new(db);

    for (role, content) in [
        (ChatRole::User, "one"),
        (ChatRole::Assistant, "two"),
        (ChatRole::User, "three"),
    ] {
        repo.append(CreateChatMessage {
            tenant_id,
            role,
            content: content.into(),
        })
        .await
        .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let recent = repo.recent(tenant_id, 2).await.unwrap();
    let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["two", "three"]);
    assert_eq!(recent[0].role, ChatRole::Assistant);
}
