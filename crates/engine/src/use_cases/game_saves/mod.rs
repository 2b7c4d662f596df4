//! Game save use cases.

mod error;
mod load_game;
mod reset_game;
mod save_game;
mod update_game;

use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, GameRepo};

pub use error::GameSaveError;
pub use load_game::LoadGame;
pub use reset_game::ResetGame;
pub use save_game::SaveGame;
pub use update_game::UpdateGame;

/// Container for game save use cases.
pub struct GameSaveUseCases {
    pub load: Arc<LoadGame>,
    pub save: Arc<SaveGame>,
    pub update: Arc<UpdateGame>,
    pub reset: Arc<ResetGame>,
}

impl GameSaveUseCases {
    pub fn new(repo: Arc<dyn GameRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            load: Arc::new(LoadGame::new(repo.clone())),
            save: Arc::new(SaveGame::new(repo.clone(), clock.clone())),
            update: Arc::new(UpdateGame::new(repo.clone(), clock)),
            reset: Arc::new(ResetGame::new(repo)),
        }
    }
}
