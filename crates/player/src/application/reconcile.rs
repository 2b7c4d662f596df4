//! Reconciliation policy between the remote mirror and the local store
//!
//! Local storage is the durable source of truth; the remote service is a
//! best-effort mirror. A remote failure never makes the result worse than
//! what is held locally.

use lastplanner_domain::GameState;

use crate::ports::outbound::SyncError;

/// Remote success wins; any remote failure (including `NotFound`) falls back
/// to the local snapshot.
pub fn reconcile_load(
    remote: Result<GameState, SyncError>,
    local: Option<GameState>,
) -> Option<GameState> {
    match remote {
        Ok(state) => Some(state),
        Err(_) => local,
    }
}

/// After a write: the remote response is canonical when the remote call
/// succeeded, otherwise the local mirror that was already written.
pub fn reconcile_write(remote: Result<GameState, SyncError>, local_mirror: GameState) -> GameState {
    remote.unwrap_or(local_mirror)
}
