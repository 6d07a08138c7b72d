mod commands;
mod registry;

use crate::config::ServerConfig;
use crate::game::Game;
use crate::protocol::ServerMessage;
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::AbortHandle;

/// Shared application state
///
/// Each game sits behind its own lock: commands and clock ticks take the
/// write lock, snapshots take the read lock, so nobody ever observes a half
/// applied transition.
#[derive(Clone)]
pub struct AppState {
    pub games: Arc<RwLock<HashMap<GameId, Arc<RwLock<Game>>>>>,
    /// Change notifications for all connected clients
    pub broadcast: broadcast::Sender<ServerMessage>,
    /// Running clock task per game
    pub turn_clocks: Arc<Mutex<HashMap<GameId, AbortHandle>>>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let (tx, _rx) = broadcast::channel(256);
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
            broadcast: tx,
            turn_clocks: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Tell subscribers that a game changed
    pub fn notify_changed(&self, game_id: &str, version: u64) {
        // Ignore send errors (no receivers connected is fine)
        let _ = self.broadcast.send(ServerMessage::StateChanged {
            game_id: game_id.to_string(),
            version,
        });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
