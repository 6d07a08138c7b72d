//! HTTP API endpoints.
//!
//! Used by lobby screens to create and list games, and by clients that poll
//! instead of holding a WebSocket open.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{status_for_code, GameError};
use crate::protocol::{ClientMessage, CreateGameRequest, GameSnapshot, GameSummary, ServerMessage};
use crate::state::AppState;
use crate::ws::{handlers, parse_role};

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

/// List all games.
///
/// GET /api/games
pub async fn list_games(State(state): State<Arc<AppState>>) -> Json<Vec<GameSummary>> {
    Json(state.list_games().await)
}

/// Create a game in the writing phase.
///
/// POST /api/games
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameSnapshot>), GameError> {
    match state.create_game(request).await {
        Ok(game) => Ok((StatusCode::CREATED, Json(game))),
        Err(e) => {
            tracing::warn!("Game creation failed: {}", e);
            Err(e)
        }
    }
}

/// Current snapshot of one game.
///
/// GET /api/games/{game_id}
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameSnapshot>, GameError> {
    state.snapshot(&game_id).await.map(Json)
}

/// Apply a command, same as sending it over the WebSocket.
///
/// POST /api/games/{game_id}/commands?role=
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Query(query): Query<RoleQuery>,
    Json(msg): Json<ClientMessage>,
) -> Response {
    let role = parse_role(query.role.as_deref());
    let reply = handlers::handle_message(msg, &role, &game_id, &state).await;
    let status = match &reply {
        ServerMessage::Error { code, .. } => status_for_code(code),
        _ => StatusCode::OK,
    };
    (status, Json(reply)).into_response()
}
