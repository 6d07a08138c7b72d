//! Error taxonomy shared by the engine, the registry and the transports.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Result type for game commands
pub type GameResult<T> = Result<T, GameError>;

/// Errors a command can fail with. A failed command never mutates the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Name already in use: {0}")]
    DuplicateName(String),

    #[error("Team index {index} out of range (game has {team_count} teams)")]
    InvalidTeam { index: usize, team_count: usize },

    #[error("{0}")]
    NotActivePlayer(String),

    #[error("{0}")]
    Validation(String),
}

impl GameError {
    /// Stable machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidState(_) => "INVALID_STATE",
            GameError::NotFound(_) => "NOT_FOUND",
            GameError::DuplicateName(_) => "DUPLICATE_NAME",
            GameError::InvalidTeam { .. } => "INVALID_TEAM",
            GameError::NotActivePlayer(_) => "NOT_ACTIVE_PLAYER",
            GameError::Validation(_) => "VALIDATION",
        }
    }

    fn status(&self) -> StatusCode {
        status_for_code(self.code())
    }
}

/// HTTP status for an error code, including the transport-level ones
pub fn status_for_code(code: &str) -> StatusCode {
    match code {
        "NOT_FOUND" => StatusCode::NOT_FOUND,
        "VALIDATION" | "INVALID_TEAM" | "PARSE_ERROR" => StatusCode::BAD_REQUEST,
        "UNAUTHORIZED" => StatusCode::FORBIDDEN,
        _ => StatusCode::CONFLICT,
    }
}

/// JSON error body returned by the HTTP API
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub msg: String,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            msg: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
