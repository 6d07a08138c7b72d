use super::Game;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl Game {
    /// Hand in a player's phrases. Once everyone has written, the first
    /// round starts with the combined set in the hat.
    pub fn submit_phrases(&mut self, player: &str, phrases: Vec<Phrase>) -> GameResult<()> {
        if self.main_phase != MainPhase::Write {
            return Err(GameError::InvalidState(
                "Phrases can only be submitted during the writing phase".to_string(),
            ));
        }
        self.require_known_player(player)?;
        if self.pool.has_submitted(player) {
            return Err(GameError::InvalidState(format!(
                "{} has already submitted phrases",
                player
            )));
        }
        if phrases.len() != self.settings.phrases_per_player {
            return Err(GameError::Validation(format!(
                "Expected {} phrases, got {}",
                self.settings.phrases_per_player,
                phrases.len()
            )));
        }

        let phrases: Vec<Phrase> = phrases.iter().map(|p| p.trim().to_string()).collect();
        if phrases.iter().any(String::is_empty) {
            return Err(GameError::Validation(
                "Phrases must not be empty".to_string(),
            ));
        }

        tracing::info!("Game {}: {} submitted {} phrases", self.id, player, phrases.len());
        self.pool.record_submission(player, phrases);
        self.check_writing_complete();
        Ok(())
    }

    /// Start the first round if every current player has written
    pub(super) fn check_writing_complete(&mut self) {
        if self.main_phase != MainPhase::Write {
            return;
        }
        if !self.roster.players().all(|p| self.pool.has_submitted(p)) {
            return;
        }

        self.pool.seal();
        self.main_phase = MainPhase::MultiWordClue;
        self.sub_phase = SubPhase::WaitForStart;
        self.pool
            .fill_for_round(self.sub_phase, self.settings.shuffle_hat)
            .expect("hat filled while a turn was open");
        tracing::info!(
            "Game {}: all phrases written, {} in the hat",
            self.id,
            self.pool.hat().len()
        );
    }
}
