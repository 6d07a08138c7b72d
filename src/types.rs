use serde::{Deserialize, Serialize};

/// Opaque ID types for readability
pub type GameId = String;
pub type PlayerName = String;
pub type Phrase = String;

/// Ordered sequence of the game's rounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MainPhase {
    Write,
    MultiWordClue,
    SingleWordClue,
    Charade,
    Done,
}

impl MainPhase {
    /// Whether turns are played in this phase
    pub fn is_round(self) -> bool {
        matches!(
            self,
            MainPhase::MultiWordClue | MainPhase::SingleWordClue | MainPhase::Charade
        )
    }

    /// Phase that follows once the hat has been emptied (or writing completed)
    pub fn next(self) -> MainPhase {
        match self {
            MainPhase::Write => MainPhase::MultiWordClue,
            MainPhase::MultiWordClue => MainPhase::SingleWordClue,
            MainPhase::SingleWordClue => MainPhase::Charade,
            MainPhase::Charade | MainPhase::Done => MainPhase::Done,
        }
    }
}

/// Turn-local micro state within a round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubPhase {
    WaitForStart,
    Started,
    ConfirmingPhrases,
}

/// Why a turn stopped accepting clicks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnEnd {
    ClockExpired,
    HatEmptied,
    EndedByPlayer,
}

/// Per-game settings fixed at creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSettings {
    pub phrases_per_player: usize,
    pub seconds_per_turn: u32,
    /// Shuffle the hat whenever it is refilled for a round
    pub shuffle_hat: bool,
    /// How many phrases the guessing player sees at once
    pub display_count: usize,
    /// Passed through to clients untouched
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Player,
    Display,
}
