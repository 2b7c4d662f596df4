//! Platform-specific implementations of the storage port.

mod desktop;
mod memory;

pub use desktop::DesktopStorageProvider;
pub use memory::InMemoryStorageProvider;
