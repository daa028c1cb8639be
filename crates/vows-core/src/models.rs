//! Domain models for Vows.
//!
//! These are the core types shared across all crates.

pub mod chat;
pub mod page;
pub mod palette;
pub mod planner;
pub mod rsvp;
pub mod spark;
pub mod tenant;
pub mod user;
