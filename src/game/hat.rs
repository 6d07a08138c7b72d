//! The phrase pool ("the hat").
//!
//! During a round every phrase of the game lives in exactly one of three
//! places: the hat, the clicked list of the open turn, or the guessed list of
//! the round. Phrases may repeat (two players can write the same thing), so
//! all three are multisets backed by vectors and every operation moves one
//! occurrence at a time.

use crate::error::{GameError, GameResult};
use crate::types::{Phrase, PlayerName, SubPhase};
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Default)]
pub struct PhrasePool {
    /// Phrase sets handed in during the writing phase, in submission order
    submissions: Vec<(PlayerName, Vec<Phrase>)>,
    /// Every phrase of the game, fixed once writing completes
    all_phrases: Vec<Phrase>,
    hat: Vec<Phrase>,
    clicked: Vec<Phrase>,
    guessed: Vec<Phrase>,
}

impl PhrasePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submission(&mut self, player: &str, phrases: Vec<Phrase>) {
        self.submissions.push((player.to_string(), phrases));
    }

    pub fn has_submitted(&self, player: &str) -> bool {
        self.submissions.iter().any(|(name, _)| name == player)
    }

    /// Forget a player's phrases (only meaningful while writing)
    pub fn drop_submission(&mut self, player: &str) {
        self.submissions.retain(|(name, _)| name != player);
    }

    /// Freeze the combined phrase set once every player has written
    pub fn seal(&mut self) {
        self.all_phrases = self
            .submissions
            .iter()
            .flat_map(|(_, phrases)| phrases.iter().cloned())
            .collect();
    }

    /// Put every phrase of the game back into the hat for a new round
    pub fn fill_for_round(&mut self, sub_phase: SubPhase, shuffle: bool) -> GameResult<()> {
        if sub_phase != SubPhase::WaitForStart {
            return Err(GameError::InvalidState(format!(
                "Cannot refill the hat while a turn is open ({:?})",
                sub_phase
            )));
        }
        assert!(
            self.clicked.is_empty(),
            "clicked phrases left over outside of a turn"
        );

        self.hat = self.all_phrases.clone();
        self.guessed.clear();
        if shuffle {
            self.hat.shuffle(&mut rand::rng());
        }
        Ok(())
    }

    /// First `n` phrases of the hat, without removing them
    pub fn take_next(&self, n: usize) -> &[Phrase] {
        &self.hat[..n.min(self.hat.len())]
    }

    /// Move one occurrence of `phrase` from the hat to the clicked list
    pub fn mark_clicked(&mut self, phrase: &str) -> GameResult<()> {
        let idx = self
            .hat
            .iter()
            .position(|p| p == phrase)
            .ok_or_else(|| GameError::NotFound(format!("Phrase not in hat: {}", phrase)))?;
        let phrase = self.hat.remove(idx);
        self.clicked.push(phrase);
        Ok(())
    }

    /// Put phrases back into the hat (at the back, behind the unseen ones)
    pub fn return_unconfirmed(&mut self, phrases: Vec<Phrase>) {
        self.hat.extend(phrases);
    }

    /// Forfeit the open turn: everything clicked goes back into the hat
    pub fn return_all_clicked(&mut self) {
        let clicked = std::mem::take(&mut self.clicked);
        self.return_unconfirmed(clicked);
    }

    /// Settle a turn. Each listed phrase consumes one occurrence from the
    /// clicked list, or failing that from the display window at the front of
    /// the hat. Clicked phrases not listed go back into the hat.
    ///
    /// Returns the confirmed phrases. On error nothing changes.
    pub fn confirm(&mut self, phrases: &[Phrase], window: usize) -> GameResult<Vec<Phrase>> {
        let mut clicked = self.clicked.clone();
        let mut hat = self.hat.clone();
        let mut window_left = window.min(hat.len());

        for phrase in phrases {
            if let Some(idx) = clicked.iter().position(|p| p == phrase) {
                clicked.remove(idx);
            } else if let Some(idx) = hat[..window_left].iter().position(|p| p == phrase) {
                hat.remove(idx);
                window_left -= 1;
            } else {
                return Err(GameError::NotFound(format!(
                    "Phrase was not played this turn: {}",
                    phrase
                )));
            }
        }

        self.hat = hat;
        self.clicked.clear();
        self.guessed.extend(phrases.iter().cloned());
        self.return_unconfirmed(clicked);
        Ok(phrases.to_vec())
    }

    pub fn is_empty(&self) -> bool {
        self.hat.is_empty()
    }

    pub fn hat(&self) -> &[Phrase] {
        &self.hat
    }

    pub fn clicked(&self) -> &[Phrase] {
        &self.clicked
    }

    pub fn guessed(&self) -> &[Phrase] {
        &self.guessed
    }

    pub fn all_phrases(&self) -> &[Phrase] {
        &self.all_phrases
    }
}

#[cfg(test)]
pub(crate) fn assert_accounted_for(pool: &PhrasePool) {
    let mut everywhere: Vec<&Phrase> = pool
        .hat
        .iter()
        .chain(pool.clicked.iter())
        .chain(pool.guessed.iter())
        .collect();
    let mut expected: Vec<&Phrase> = pool.all_phrases.iter().collect();
    everywhere.sort();
    expected.sort();
    assert_eq!(everywhere, expected, "phrase duplicated or lost");
}
