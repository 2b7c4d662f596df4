//! Application layer - session identity, local store, reconciliation and the
//! services built on them.

pub mod local_store;
pub mod reconcile;
pub mod services;
pub mod session_identity;

pub use local_store::LocalGameStore;
pub use session_identity::SessionIdentity;
