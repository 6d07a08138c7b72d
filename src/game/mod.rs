//! The authoritative game engine.
//!
//! A [`Game`] combines the phrase pool, the turn clock, the roster and the
//! scoreboard. It is a plain synchronous value: callers serialize access
//! (see `state::AppState`) and every command either applies completely or
//! returns an error without touching anything.

mod admin;
mod clock;
mod hat;
mod roster;
mod score;
mod turn;
mod writing;

pub use clock::{ClockTick, TurnClock};
pub use hat::PhrasePool;
pub use roster::{Roster, TurnOwner};
pub use score::Scoreboard;
pub use turn::TickOutcome;

use crate::error::{GameError, GameResult};
use crate::protocol::GameSnapshot;
use crate::types::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    version: u64,
    settings: GameSettings,
    main_phase: MainPhase,
    sub_phase: SubPhase,
    roster: Roster,
    pool: PhrasePool,
    clock: TurnClock,
    scoreboard: Scoreboard,
    /// Incremented on every turn start; lets stale clock ticks be recognised
    turn_no: u64,
    turn_end: Option<TurnEnd>,
    /// Phrases confirmed in the last settled turn
    previous_turn_phrases: Vec<Phrase>,
    created_at: String,
}

impl Game {
    /// Create a game in the writing phase
    pub fn new(id: GameId, teams: Vec<Vec<PlayerName>>, settings: GameSettings) -> GameResult<Self> {
        if id.trim().is_empty() {
            return Err(GameError::Validation("Game id must not be empty".to_string()));
        }
        if settings.phrases_per_player == 0 {
            return Err(GameError::Validation(
                "Each player must write at least one phrase".to_string(),
            ));
        }
        if settings.seconds_per_turn == 0 {
            return Err(GameError::Validation(
                "Turns must last at least one second".to_string(),
            ));
        }
        if settings.display_count == 0 {
            return Err(GameError::Validation(
                "At least one phrase must be on display".to_string(),
            ));
        }

        let roster = Roster::new(teams)?;
        let scoreboard = Scoreboard::new(roster.team_count());
        let clock = TurnClock::new(settings.seconds_per_turn);

        tracing::info!(
            "Game {} created: {} players in {} teams, {} phrases each, {}s turns",
            id,
            roster.player_count(),
            roster.team_count(),
            settings.phrases_per_player,
            settings.seconds_per_turn
        );

        Ok(Self {
            id,
            version: 1,
            settings,
            main_phase: MainPhase::Write,
            sub_phase: SubPhase::WaitForStart,
            roster,
            pool: PhrasePool::new(),
            clock,
            scoreboard,
            turn_no: 0,
            turn_end: None,
            previous_turn_phrases: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record that a change was applied; clients compare versions
    pub fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    pub fn main_phase(&self) -> MainPhase {
        self.main_phase
    }

    pub fn sub_phase(&self) -> SubPhase {
        self.sub_phase
    }

    pub fn turn_no(&self) -> u64 {
        self.turn_no
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn pool(&self) -> &PhrasePool {
        &self.pool
    }

    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn previous_turn_phrases(&self) -> &[Phrase] {
        &self.previous_turn_phrases
    }

    /// Owner of the current turn while a round is being played
    pub fn active_player(&self) -> Option<TurnOwner> {
        self.main_phase
            .is_round()
            .then(|| self.roster.current())
    }

    /// Whether a turn clock should currently be counting down
    pub fn clock_running(&self) -> bool {
        self.main_phase.is_round() && self.sub_phase == SubPhase::Started
    }

    fn require_round(&self) -> GameResult<()> {
        if self.main_phase.is_round() {
            Ok(())
        } else {
            Err(GameError::InvalidState(format!(
                "No round is being played (phase {:?})",
                self.main_phase
            )))
        }
    }

    fn require_sub_phase(&self, expected: SubPhase) -> GameResult<()> {
        if self.sub_phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidState(format!(
                "Expected {:?} but the turn is {:?}",
                expected, self.sub_phase
            )))
        }
    }

    fn require_known_player(&self, player: &str) -> GameResult<()> {
        if self.roster.contains(player) {
            Ok(())
        } else {
            Err(GameError::NotFound(format!("Player not found: {}", player)))
        }
    }

    /// The acting player must own the current turn
    fn require_active_player(&self, player: &str) -> GameResult<TurnOwner> {
        self.require_known_player(player)?;
        let owner = self.roster.current();
        if owner.player != player {
            return Err(GameError::NotActivePlayer(format!(
                "{} tried to act but it is {}'s turn",
                player, owner.player
            )));
        }
        Ok(owner)
    }

    /// Move on to the next round (or finish the game) once the hat is empty
    fn advance_round(&mut self) {
        debug_assert!(self.pool.is_empty());
        debug_assert_eq!(self.sub_phase, SubPhase::WaitForStart);

        self.main_phase = self.main_phase.next();
        if self.main_phase == MainPhase::Done {
            self.clock.clear_carry_over();
            self.scoreboard.freeze();
            tracing::info!(
                "Game {} finished with scores {:?}",
                self.id,
                self.scoreboard.scores()
            );
            return;
        }

        self.pool
            .fill_for_round(self.sub_phase, self.settings.shuffle_hat)
            .expect("hat refilled while a turn was open");
        tracing::info!(
            "Game {} entering {:?} with {} phrases in the hat",
            self.id,
            self.main_phase,
            self.pool.hat().len()
        );
    }

    /// Serializable view handed to display clients
    pub fn snapshot(&self) -> GameSnapshot {
        let turn_visible = self.main_phase.is_round() && self.sub_phase != SubPhase::WaitForStart;
        let phrases_on_display = if turn_visible {
            self.pool.take_next(self.settings.display_count).to_vec()
        } else {
            Vec::new()
        };
        let carry_over_seconds = if self.main_phase.is_round() && self.sub_phase == SubPhase::WaitForStart {
            self.clock.pending_carry_over()
        } else {
            None
        };
        let player_writing_status: BTreeMap<PlayerName, bool> = self
            .roster
            .players()
            .map(|p| (p.clone(), self.pool.has_submitted(p)))
            .collect();

        GameSnapshot {
            id: self.id.clone(),
            version: self.version,
            main_phase: self.main_phase,
            sub_phase: self.sub_phase,
            teams: self.roster.teams().to_vec(),
            active_team_index: self.roster.active_team(),
            active_player_index_per_team: self.roster.on_deck().to_vec(),
            active_player: self.active_player().map(|owner| owner.player),
            hat_size: self.pool.hat().len(),
            phrases_on_display,
            clicked_phrases: self.pool.clicked().to_vec(),
            previous_turn_phrases: self.previous_turn_phrases.clone(),
            turn_end: self.turn_end,
            phrases_per_player: self.settings.phrases_per_player,
            seconds_per_turn: self.clock.seconds_per_turn(),
            seconds_remaining: self.clock.seconds_remaining(),
            carry_over_seconds,
            player_writing_status,
            scores: self.scoreboard.scores().to_vec(),
            scores_final: self.scoreboard.is_final(),
            leading_team: self.scoreboard.leader(),
            turn_no: self.turn_no,
            video_url: self.settings.video_url.clone(),
            created_at: self.created_at.clone(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_new_game_validation() {
        let ok = Game::new("g".to_string(), teams(&[&["a"], &["b"]]), settings(2, 30));
        assert!(ok.is_ok());

        let no_phrases = Game::new("g".to_string(), teams(&[&["a"], &["b"]]), settings(0, 30));
        assert!(matches!(no_phrases, Err(GameError::Validation(_))));

        let no_time = Game::new("g".to_string(), teams(&[&["a"], &["b"]]), settings(2, 0));
        assert!(matches!(no_time, Err(GameError::Validation(_))));

        let one_team = Game::new("g".to_string(), teams(&[&["a", "b"]]), settings(2, 30));
        assert!(matches!(one_team, Err(GameError::Validation(_))));

        let blank_id = Game::new(" ".to_string(), teams(&[&["a"], &["b"]]), settings(2, 30));
        assert!(matches!(blank_id, Err(GameError::Validation(_))));
    }

    #[test]
    fn test_initial_snapshot() {
        let game = Game::new("g".to_string(), teams(&[&["a"], &["b"]]), settings(2, 30)).unwrap();
        let snap = game.snapshot();
        assert_eq!(snap.main_phase, MainPhase::Write);
        assert_eq!(snap.sub_phase, SubPhase::WaitForStart);
        assert_eq!(snap.active_player, None);
        assert_eq!(snap.hat_size, 0);
        assert_eq!(snap.scores, vec![0, 0]);
        assert_eq!(snap.leading_team, None);
        assert_eq!(snap.player_writing_status.get("a"), Some(&false));
        assert_eq!(snap.seconds_remaining, 30);
        assert_eq!(snap.version, 1);
    }

    #[test]
    fn test_snapshot_shows_display_window_only_during_turn() {
        let mut game = playing_game(&[&["a"], &["b"]], 3, 30);
        assert!(game.snapshot().phrases_on_display.is_empty());

        game.start_turn("a").unwrap();
        let snap = game.snapshot();
        assert_eq!(snap.phrases_on_display, phrases(&["a1", "a2"]));
        assert_eq!(snap.active_player.as_deref(), Some("a"));
    }
}
