// Public API for integration tests and potential library usage

pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod state;
pub mod timer;
pub mod types;
pub mod ws;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// All HTTP and WebSocket routes
pub fn router(state: Arc<state::AppState>) -> Router {
    Router::new()
        .route("/api/games", get(api::list_games).post(api::create_game))
        .route("/api/games/{game_id}", get(api::get_game))
        .route("/api/games/{game_id}/commands", post(api::post_command))
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
