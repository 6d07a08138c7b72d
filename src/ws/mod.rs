pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::Role;

/// Version string sent in the welcome message
pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub game: String,
    pub role: Option<String>,
}

pub fn parse_role(role: Option<&str>) -> Role {
    match role {
        Some("host") => Role::Host,
        Some("player") => Role::Player,
        _ => Role::Display,
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!(
        "WebSocket connection request: game={}, role={:?}",
        params.game,
        params.role
    );

    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, params: WsQuery, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let role = parse_role(params.role.as_deref());
    let game_id = params.game;

    // Subscribe before taking the snapshot so no change slips in between
    let mut broadcast_rx = state.broadcast.subscribe();

    let first = match state.snapshot(&game_id).await {
        Ok(game) => ServerMessage::Welcome {
            protocol: PROTOCOL_VERSION.to_string(),
            role,
            game,
            server_now: chrono::Utc::now().to_rfc3339(),
        },
        Err(e) => {
            tracing::warn!("WebSocket for unknown game {}", game_id);
            handlers::reply(Err(e))
        }
    };
    let welcomed = matches!(first, ServerMessage::Welcome { .. });

    if let Ok(msg) = serde_json::to_string(&first) {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            tracing::error!("Failed to send welcome message");
            return;
        }
    }
    if !welcomed {
        let _ = sender.send(Message::Close(None)).await;
        return;
    }

    tracing::info!("WebSocket connected to game {} as {:?}", game_id, role);

    loop {
        tokio::select! {
            broadcast_msg = broadcast_rx.recv() => {
                let msg = match broadcast_msg {
                    Ok(msg) => msg,
                    // Clients re-fetch on the next signal anyway
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("WebSocket for game {} lagged by {} messages", game_id, skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let ours = matches!(&msg, ServerMessage::StateChanged { game_id: id, .. } if *id == game_id);
                if !ours {
                    continue;
                }
                if let Ok(json) = serde_json::to_string(&msg) {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);

                        let response = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                handlers::handle_message(client_msg, &role, &game_id, &state).await
                            }
                            Err(e) => {
                                tracing::warn!("Failed to parse client message: {}", e);
                                ServerMessage::Error {
                                    code: "PARSE_ERROR".to_string(),
                                    msg: format!("Invalid message format: {}", e),
                                }
                            }
                        };
                        if let Ok(json) = serde_json::to_string(&response) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                tracing::error!("Failed to send response");
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    tracing::info!("WebSocket connection closed for game {} ({:?})", game_id, role);
}
