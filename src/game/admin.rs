//! Roster corrections made while a game is running.

use super::Game;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl Game {
    fn require_not_done(&self) -> GameResult<()> {
        if self.main_phase == MainPhase::Done {
            return Err(GameError::InvalidState(
                "The game is over and can no longer change".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a turn is underway (clock running or awaiting confirmation)
    fn turn_in_progress(&self) -> bool {
        self.main_phase.is_round() && self.sub_phase != SubPhase::WaitForStart
    }

    pub fn add_player(&mut self, team: usize, name: &str) -> GameResult<PlayerName> {
        self.require_not_done()?;
        let name = self.roster.add_player(team, name)?;
        tracing::info!("Game {}: {} joined team {}", self.id, name, team);
        Ok(name)
    }

    /// Remove a player. If they own the turn in progress, that turn is
    /// forfeited first so nothing is left pointing at them.
    pub fn remove_player(&mut self, name: &str) -> GameResult<()> {
        self.require_not_done()?;
        self.require_known_player(name)?;
        if self.roster.player_count() == 1 {
            return Err(GameError::InvalidState(
                "Cannot remove the last player of the game".to_string(),
            ));
        }

        let owns_turn = self
            .active_player()
            .is_some_and(|owner| owner.player == name);
        if owns_turn {
            if self.turn_in_progress() {
                self.forfeit_turn();
            } else {
                // unused seconds were earned by this player alone
                self.clock.clear_carry_over();
            }
        }

        self.roster.remove_player(name)?;
        tracing::info!("Game {}: {} removed", self.id, name);

        if self.main_phase == MainPhase::Write {
            self.pool.drop_submission(name);
            self.check_writing_complete();
        }
        Ok(())
    }

    /// Host override: end the open turn with nothing confirmed and move on,
    /// regardless of whose turn it really is.
    pub fn skip(&mut self, target: &str) -> GameResult<()> {
        if !self.turn_in_progress() {
            return Err(GameError::NotActivePlayer(format!(
                "Cannot skip {}: no turn is open",
                target
            )));
        }
        self.require_known_player(target)?;

        let owner = self.roster.current();
        if owner.player != target {
            tracing::warn!(
                "Game {}: skip requested for {} but {} owns the turn",
                self.id,
                target,
                owner.player
            );
        }
        self.forfeit_turn();
        Ok(())
    }
}
