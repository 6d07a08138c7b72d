use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Commands sent by display clients. Every command names the acting player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the current snapshot (clients re-fetch on every notification)
    FetchState,
    SubmitPhrases {
        player: PlayerName,
        phrases: Vec<Phrase>,
    },
    StartTurn {
        player: PlayerName,
    },
    MarkPhraseClicked {
        player: PlayerName,
        phrase: Phrase,
    },
    EndTurn {
        player: PlayerName,
    },
    ConfirmPhrases {
        player: PlayerName,
        phrases: Vec<Phrase>,
    },
    // Host-only messages
    /// End the current turn with nothing confirmed and rotate
    HostSkipPlayer {
        player: PlayerName,
        target: PlayerName,
    },
    HostAddPlayer {
        player: PlayerName,
        team_index: usize,
        name: PlayerName,
    },
    HostRemovePlayer {
        player: PlayerName,
        name: PlayerName,
    },
}

impl ClientMessage {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::FetchState => "fetch_state",
            ClientMessage::SubmitPhrases { .. } => "submit_phrases",
            ClientMessage::StartTurn { .. } => "start_turn",
            ClientMessage::MarkPhraseClicked { .. } => "mark_phrase_clicked",
            ClientMessage::EndTurn { .. } => "end_turn",
            ClientMessage::ConfirmPhrases { .. } => "confirm_phrases",
            ClientMessage::HostSkipPlayer { .. } => "host_skip_player",
            ClientMessage::HostAddPlayer { .. } => "host_add_player",
            ClientMessage::HostRemovePlayer { .. } => "host_remove_player",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        role: Role,
        game: GameSnapshot,
        server_now: String,
    },
    /// Full snapshot, sent in reply to a command or a fetch
    State {
        game: GameSnapshot,
    },
    /// Wake-up signal; the payload is only a hint, clients re-fetch
    StateChanged {
        game_id: GameId,
        version: u64,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// Everything a display client needs to render a game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub id: GameId,
    pub version: u64,
    pub main_phase: MainPhase,
    pub sub_phase: SubPhase,
    pub teams: Vec<Vec<PlayerName>>,
    pub active_team_index: usize,
    pub active_player_index_per_team: Vec<usize>,
    /// Owner of the current turn; `None` outside of the clue rounds
    pub active_player: Option<PlayerName>,
    pub hat_size: usize,
    /// Front of the hat shown to the guessing player during a turn
    pub phrases_on_display: Vec<Phrase>,
    pub clicked_phrases: Vec<Phrase>,
    pub previous_turn_phrases: Vec<Phrase>,
    pub turn_end: Option<TurnEnd>,
    pub phrases_per_player: usize,
    pub seconds_per_turn: u32,
    pub seconds_remaining: u32,
    /// Set while waiting for a continued turn that resumes with fewer than
    /// `seconds_per_turn` seconds
    pub carry_over_seconds: Option<u32>,
    pub player_writing_status: BTreeMap<PlayerName, bool>,
    pub scores: Vec<u32>,
    pub scores_final: bool,
    /// Team with the most confirmed phrases, `None` on a tie
    pub leading_team: Option<usize>,
    pub turn_no: u64,
    pub video_url: Option<String>,
    pub created_at: String,
}

/// Game creation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Generated when omitted
    #[serde(default)]
    pub id: Option<GameId>,
    pub teams: Vec<Vec<PlayerName>>,
    pub phrases_per_player: usize,
    pub seconds_per_turn: u32,
    #[serde(default)]
    pub video_url: Option<String>,
    /// Overrides the server default
    #[serde(default)]
    pub shuffle_hat: Option<bool>,
}

/// Entry of the game list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSummary {
    pub id: GameId,
    pub main_phase: MainPhase,
    pub player_count: usize,
}
