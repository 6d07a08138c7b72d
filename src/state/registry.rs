use super::AppState;
use crate::error::{GameError, GameResult};
use crate::game::Game;
use crate::protocol::{CreateGameRequest, GameSnapshot, GameSummary};
use crate::types::*;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Attempts at finding an unused generated id before giving up
const ID_ATTEMPTS: usize = 16;

fn generate_game_id() -> Option<GameId> {
    petname::petname(2, "-")
}

impl AppState {
    /// Create a game in the writing phase
    pub async fn create_game(&self, request: CreateGameRequest) -> GameResult<GameSnapshot> {
        let settings = GameSettings {
            phrases_per_player: request.phrases_per_player,
            seconds_per_turn: request.seconds_per_turn,
            shuffle_hat: request.shuffle_hat.unwrap_or(self.config.shuffle_hat),
            display_count: self.config.display_count,
            video_url: request.video_url,
        };

        let mut games = self.games.write().await;
        let id = match request.id {
            Some(id) => {
                let id = id.trim().to_string();
                if games.contains_key(&id) {
                    return Err(GameError::DuplicateName(format!("game id {}", id)));
                }
                id
            }
            None => (0..ID_ATTEMPTS)
                .filter_map(|_| generate_game_id())
                .find(|id| !games.contains_key(id))
                .ok_or_else(|| {
                    GameError::InvalidState("Could not generate a free game id".to_string())
                })?,
        };

        let game = Game::new(id.clone(), request.teams, settings)?;
        let snapshot = game.snapshot();
        games.insert(id, Arc::new(RwLock::new(game)));
        Ok(snapshot)
    }

    /// Handle to one game's lock
    pub async fn game_handle(&self, game_id: &str) -> GameResult<Arc<RwLock<Game>>> {
        self.games
            .read()
            .await
            .get(game_id)
            .cloned()
            .ok_or_else(|| GameError::NotFound(format!("Game not found: {}", game_id)))
    }

    /// Consistent read-only view of a game
    pub async fn snapshot(&self, game_id: &str) -> GameResult<GameSnapshot> {
        let handle = self.game_handle(game_id).await?;
        let game = handle.read().await;
        Ok(game.snapshot())
    }

    /// All games, sorted by id
    pub async fn list_games(&self) -> Vec<GameSummary> {
        let handles: Vec<_> = self.games.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            let game = handle.read().await;
            summaries.push(GameSummary {
                id: game.id().to_string(),
                main_phase: game.main_phase(),
                player_count: game.roster().player_count(),
            });
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }
}
