//! LastPlanner Player crate.
//!
//! Local-first save handling for the game client: a device session id, a
//! durable local store, and a best-effort mirror to the engine's REST API.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;

pub use application::services::{GameSyncService, PlayError, PlayService};
pub use application::{LocalGameStore, SessionIdentity};
pub use config::PlayerConfig;

#[cfg(test)]
mod e2e_tests;
