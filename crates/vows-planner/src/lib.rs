//! Vows Planner: application services over the repository traits:
//! page editing, RSVP forms, the scribe assistant, the admin console
//! and the inspiration board.

pub mod admin;
pub mod board;
pub mod planner;
pub mod rsvp;
pub mod scribe;

pub use admin::AdminService;
pub use board::BoardService;
pub use planner::PlannerService;
pub use rsvp::RsvpService;
pub use scribe::{Assistant, CommandAssistant, ScribeService};
