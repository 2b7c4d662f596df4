//! Infrastructure adapters for the player's outbound ports.

pub mod clock;
pub mod http_client;
pub mod platform;
