//! Vows Core: domain models, template registry, page views and
//! repository traits shared across all crates.

pub mod error;
pub mod events;
pub mod export;
pub mod fields;
pub mod lookup;
pub mod models;
pub mod reorder;
pub mod repository;
pub mod template;
pub mod view;

pub use error::{VowsError, VowsResult};
