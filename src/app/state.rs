//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::GameServer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub game: Arc<GameServer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            game: Arc::new(GameServer::new()),
        }
    }
}
