//! Turn transitions: start, click, end, clock ticks and confirmation.

use super::{ClockTick, Game};
use crate::error::GameResult;
use crate::types::*;

/// What a clock tick did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to a turn that is no longer running; nothing changed
    Stale,
    /// Clock decremented, turn still running
    Running(u32),
    /// Clock reached zero and the turn moved to confirmation
    Expired,
}

impl Game {
    /// `WaitForStart -> Started`, by the on-deck player
    pub fn start_turn(&mut self, player: &str) -> GameResult<u32> {
        self.require_round()?;
        self.require_sub_phase(SubPhase::WaitForStart)?;
        self.require_active_player(player)?;

        if self.clock.pending_carry_over().is_none() {
            self.previous_turn_phrases.clear();
        }
        let seconds = self.clock.start();
        self.turn_no += 1;
        self.turn_end = None;
        self.sub_phase = SubPhase::Started;

        tracing::info!(
            "Game {}: turn {} started by {} with {}s",
            self.id,
            self.turn_no,
            player,
            seconds
        );
        Ok(seconds)
    }

    /// The active player pulled a phrase and got it guessed (tentatively).
    /// Emptying the hat ends the turn.
    pub fn mark_clicked(&mut self, player: &str, phrase: &str) -> GameResult<()> {
        self.require_round()?;
        self.require_sub_phase(SubPhase::Started)?;
        self.require_active_player(player)?;

        self.pool.mark_clicked(phrase)?;
        tracing::debug!("Game {}: {} got '{}' guessed", self.id, player, phrase);

        if self.pool.is_empty() {
            self.stop_turn(TurnEnd::HatEmptied);
        }
        Ok(())
    }

    /// The active player stops early
    pub fn end_turn(&mut self, player: &str) -> GameResult<()> {
        self.require_round()?;
        self.require_sub_phase(SubPhase::Started)?;
        self.require_active_player(player)?;

        self.stop_turn(TurnEnd::EndedByPlayer);
        Ok(())
    }

    /// One second elapsed for `turn_no`. Ticks for any other turn, or while
    /// the clock is not running, are ignored.
    pub fn tick(&mut self, turn_no: u64) -> TickOutcome {
        if !self.clock_running() || turn_no != self.turn_no {
            return TickOutcome::Stale;
        }

        match self.clock.decrement() {
            ClockTick::Running(left) => TickOutcome::Running(left),
            ClockTick::Expired | ClockTick::Idle => {
                self.stop_turn(TurnEnd::ClockExpired);
                TickOutcome::Expired
            }
        }
    }

    /// `Started -> ConfirmingPhrases`
    fn stop_turn(&mut self, reason: TurnEnd) {
        self.sub_phase = SubPhase::ConfirmingPhrases;
        self.turn_end = Some(reason);
        tracing::info!(
            "Game {}: turn {} over ({:?}) with {}s left, {} phrases clicked",
            self.id,
            self.turn_no,
            reason,
            self.clock.seconds_remaining(),
            self.pool.clicked().len()
        );
    }

    /// `ConfirmingPhrases -> WaitForStart`: score the confirmed phrases,
    /// return the rest to the hat and rotate. A turn that emptied the hat
    /// with time left is continued by the same player with the remainder.
    pub fn confirm_phrases(&mut self, player: &str, phrases: &[Phrase]) -> GameResult<Vec<Phrase>> {
        self.require_round()?;
        self.require_sub_phase(SubPhase::ConfirmingPhrases)?;
        let owner = self.require_active_player(player)?;

        let confirmed = self.pool.confirm(phrases, self.settings.display_count)?;
        self.scoreboard.credit(owner.team, confirmed.len());
        self.previous_turn_phrases = confirmed.clone();

        let continues = self.turn_end == Some(TurnEnd::HatEmptied)
            && self.clock.seconds_remaining() > 0;
        if continues {
            self.clock.carry_over();
        } else {
            self.clock.clear_carry_over();
            self.roster.advance();
        }
        self.turn_end = None;
        self.sub_phase = SubPhase::WaitForStart;

        tracing::info!(
            "Game {}: {} confirmed {} phrases for team {}{}",
            self.id,
            player,
            confirmed.len(),
            owner.team,
            if continues { ", continuing" } else { "" }
        );

        if self.pool.is_empty() {
            self.advance_round();
        }
        Ok(confirmed)
    }

    /// End the current turn with nothing confirmed and rotate. Used by skip
    /// and by removing the active player.
    pub(super) fn forfeit_turn(&mut self) {
        self.pool.return_all_clicked();
        self.clock.clear_carry_over();
        self.previous_turn_phrases.clear();
        self.turn_end = None;
        self.sub_phase = SubPhase::WaitForStart;
        let next = self.roster.advance();
        debug_assert!(!self.pool.is_empty());

        tracing::info!(
            "Game {}: turn {} forfeited, {} is up",
            self.id,
            self.turn_no,
            next.player
        );
    }
}
