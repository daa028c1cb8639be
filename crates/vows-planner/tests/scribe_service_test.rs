//! Integration tests for the scribe service.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use vows_core::error::VowsError;
use vows_core::events::{PlannerEventBus, PlannerEventKind};
use vows_core::lookup::find_page;
use vows_core::models::chat::ChatRole;
use vows_core::models::planner::CreatePlanner;
use vows_core::models::tenant::CreateTenant;
use vows_core::repository::{PageRepository, PlannerRepository, TenantRepository};
use vows_core::template::{self, GUEST_LIST};
use vows_core::view::guests;
use vows_db::repository::{
    SurrealChatRepository, SurrealPageRepository, SurrealPlannerRepository,
    SurrealTenantRepository,
};
use vows_planner::{CommandAssistant, ScribeService};

type TestScribe = ScribeService<
    SurrealPlannerRepository<Db>,
    SurrealPageRepository<Db>,
    SurrealChatRepository<Db>,
    CommandAssistant,
>;

async fn setup() -> (TestScribe, PlannerEventBus, Surreal<Db>, Uuid, Uuid) {
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
    let planner = SurrealPlannerRepository::new(db.clone())
        .create(CreatePlanner {
            tenant_id: tenant.id,
            title: "Our Wedding".into(),
        })
        .await
        .unwrap();
    let pages = SurrealPageRepository::new(db.clone());
    for page in template::seed_pages(planner.id) {
        pages.create(page).await.unwrap();
    }

    let events = PlannerEventBus::default();
    let scribe = ScribeService::new(
        SurrealPlannerRepository::new(db.clone()),
        SurrealPageRepository::new(db.clone()),
        SurrealChatRepository::new(db.clone()),
        CommandAssistant,
        events.clone(),
    );
    (scribe, events, db, tenant.id, planner.id)
}

#[tokio::test]
async fn edit_command_changes_planner_and_broadcasts() {
    let (scribe, events, db, tenant_id, planner_id) = setup().await;
    let mut rx = events.subscribe();

    let reply = scribe.send(tenant_id, "add guest Ben Ng").await.unwrap();
    assert!(reply.planner_changed);
    assert_eq!(reply.message.role, ChatRole::Assistant);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.tenant_id, tenant_id);
    assert_eq!(event.kind, PlannerEventKind::DataChanged);

    let pages = SurrealPageRepository::new(db)
        .list_by_planner(planner_id)
        .await
        .unwrap();
    let guest_list = find_page(&pages, GUEST_LIST).unwrap();
    let names: Vec<String> = guests::guests(&guest_list.fields)
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, ["Ben Ng"]);
}

#[tokio::test]
async fn plain_question_does_not_change_planner() {
    let (scribe, _, _, tenant_id, _) = setup().await;

    let reply = scribe.send(tenant_id, "summary").await.unwrap();
    assert!(!reply.planner_changed);
    assert!(reply.message.content.contains("Guests"));
}

#[tokio::test]
async fn history_keeps_both_sides_in_order() {
    let (scribe, _, _, tenant_id, _) = setup().await;

    scribe.send(tenant_id, "hello").await.unwrap();
    let history = scribe.history(tenant_id, 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, ChatRole::User);
    assert_eq!(history[0].content, "hello");
    assert_eq!(history[1].role, ChatRole::Assistant);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let (scribe, _, _, tenant_id, _) = setup().await;

    let err = scribe.send(tenant_id, "   ").await.unwrap_err();
    assert!(matches!(err, VowsError::Validation { .. }));
    assert!(scribe.history(tenant_id, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn message_length_counts_characters() {
    let (scribe, _, _, tenant_id, _) = setup().await;

    // 4000 two-byte characters: over the limit in bytes, not in characters.
    let accented = "é".repeat(4000);
    assert!(scribe.send(tenant_id, &accented).await.is_ok());

    let err = scribe
        .send(tenant_id, &"é".repeat(4001))
        .await
        .unwrap_err();
    assert!(matches!(err, VowsError::Validation { .. }));
}
