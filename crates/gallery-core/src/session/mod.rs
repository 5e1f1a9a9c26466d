//! Stateful catalog browsing on top of a [`CatalogSource`](crate::network::CatalogSource).
//!
//! - `catalog` drives pagination, search and refresh for the item list
//! - `detail` loads single artwork records
//! - `debounce` delays search input until typing pauses
//! - `state` holds the snapshots published to observers

mod catalog;
mod debounce;
mod detail;
mod state;

pub use catalog::{CatalogSession, FetchOutcome};
pub use debounce::Debouncer;
pub use detail::{DetailLoader, DetailState};
pub use state::{SessionPhase, SessionState};
