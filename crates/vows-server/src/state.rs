//! Shared application state handed to every handler.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use vows_auth::{AuthConfig, AuthService};
use vows_core::events::PlannerEventBus;
use vows_db::repository::{
    SurrealChatRepository, SurrealPageRepository, SurrealPaletteRepository,
    SurrealPlannerRepository, SurrealRsvpRepository, SurrealSparkRepository,
    SurrealTenantRepository, SurrealUserRepository,
};
use vows_planner::{
    AdminService, BoardService, CommandAssistant, PlannerService, RsvpService, ScribeService,
};

type Planners = SurrealPlannerRepository<Any>;
type Pages = SurrealPageRepository<Any>;
type Forms = SurrealRsvpRepository<Any>;

pub type Auth =
    AuthService<SurrealUserRepository<Any>, SurrealTenantRepository<Any>, Planners, Pages>;
pub type Planner = PlannerService<Planners, Pages, Forms>;
pub type Rsvp = RsvpService<Planners, Pages, Forms>;
pub type Scribe = ScribeService<Planners, Pages, SurrealChatRepository<Any>, CommandAssistant>;
pub type Admin = AdminService<SurrealUserRepository<Any>>;
pub type Board = BoardService<SurrealPaletteRepository<Any>, SurrealSparkRepository<Any>>;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Auth>,
    pub planner: Arc<Planner>,
    pub rsvp: Arc<Rsvp>,
    pub scribe: Arc<Scribe>,
    pub admin: Arc<Admin>,
    pub board: Arc<Board>,
    pub events: PlannerEventBus,
    pub public_base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        db: Surreal<Any>,
        auth_config: AuthConfig,
        events: PlannerEventBus,
        public_base_url: String,
    ) -> Self {
        let planners = || SurrealPlannerRepository::new(db.clone());
        let pages = || SurrealPageRepository::new(db.clone());
        let forms = || SurrealRsvpRepository::new(db.clone());

        Self {
            auth: Arc::new(AuthService::new(
                SurrealUserRepository::new(db.clone()),
                SurrealTenantRepository::new(db.clone()),
                planners(),
                pages(),
                auth_config,
            )),
            planner: Arc::new(PlannerService::new(
                planners(),
                pages(),
                forms(),
                events.clone(),
            )),
            rsvp: Arc::new(RsvpService::new(planners(), pages(), forms(), events.clone())),
            scribe: Arc::new(ScribeService::new(
                planners(),
                pages(),
                SurrealChatRepository::new(db.clone()),
                CommandAssistant,
                events.clone(),
            )),
            admin: Arc::new(AdminService::new(SurrealUserRepository::new(db.clone()))),
            board: Arc::new(BoardService::new(
                SurrealPaletteRepository::new(db.clone()),
                SurrealSparkRepository::new(db.clone()),
            )),
            events,
            public_base_url: public_base_url.into(),
        }
    }
}
