//! Client message dispatch
//!
//! Shared by the WebSocket loop and the HTTP command endpoint. The role gate
//! is checked here, then the command goes to the game registry.

use crate::error::GameResult;
use crate::protocol::{ClientMessage, GameSnapshot, ServerMessage};
use crate::state::AppState;
use crate::types::Role;
use std::sync::Arc;

/// Macro to check host authorization and return early if unauthorized
macro_rules! check_host {
    ($role:expr, $action:expr) => {
        if *$role != Role::Host {
            return ServerMessage::Error {
                code: "UNAUTHORIZED".to_string(),
                msg: format!("Only host can {}", $action),
            };
        }
    };
}

/// Handle a client message for one game and build the reply
pub async fn handle_message(
    msg: ClientMessage,
    role: &Role,
    game_id: &str,
    state: &Arc<AppState>,
) -> ServerMessage {
    match &msg {
        ClientMessage::HostSkipPlayer { .. } => check_host!(role, "skip players"),
        ClientMessage::HostAddPlayer { .. } => check_host!(role, "add players"),
        ClientMessage::HostRemovePlayer { .. } => check_host!(role, "remove players"),
        _ => {}
    }

    tracing::debug!("Game {}: {:?} sent {}", game_id, role, msg.kind());
    reply(state.apply(game_id, msg).await)
}

/// Turn a command result into the message sent back to the client
pub fn reply(result: GameResult<GameSnapshot>) -> ServerMessage {
    match result {
        Ok(game) => ServerMessage::State { game },
        Err(e) => ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        },
    }
}
