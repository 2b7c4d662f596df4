//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with external systems without
//! depending on concrete implementations.

pub mod clock;
pub mod game_service_port;
pub mod storage;

pub use clock::ClockPort;
pub use game_service_port::{GameServicePort, SyncError};
pub use storage::{storage_keys, StorageProvider};

#[cfg(test)]
pub use clock::MockClockPort;
#[cfg(test)]
pub use game_service_port::MockGameServicePort;
