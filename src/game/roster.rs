//! Teams, players and turn rotation.
//!
//! Rotation is round-robin across teams; inside each team an independent
//! on-deck pointer walks the players, so a smaller team cycles back to its
//! first player sooner than a larger one.

use crate::error::{GameError, GameResult};
use crate::types::PlayerName;
use serde::Serialize;

/// Who plays the current (or next) turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOwner {
    pub team: usize,
    pub player: PlayerName,
}

#[derive(Debug, Clone)]
pub struct Roster {
    teams: Vec<Vec<PlayerName>>,
    active_team: usize,
    /// Index of the on-deck player within each team
    on_deck: Vec<usize>,
}

impl Roster {
    /// Build a roster, validating names and team sizes
    pub fn new(teams: Vec<Vec<PlayerName>>) -> GameResult<Self> {
        if teams.len() < 2 {
            return Err(GameError::Validation(
                "A game needs at least two teams".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        let mut cleaned = Vec::with_capacity(teams.len());
        for (idx, team) in teams.into_iter().enumerate() {
            if team.is_empty() {
                return Err(GameError::Validation(format!("Team {} has no players", idx)));
            }
            let mut players = Vec::with_capacity(team.len());
            for name in team {
                let name = validate_name(&name)?;
                if !seen.insert(name.clone()) {
                    return Err(GameError::DuplicateName(name));
                }
                players.push(name);
            }
            cleaned.push(players);
        }

        let team_count = cleaned.len();
        Ok(Self {
            teams: cleaned,
            active_team: 0,
            on_deck: vec![0; team_count],
        })
    }

    /// The owner of the current turn
    pub fn current(&self) -> TurnOwner {
        let team = &self.teams[self.active_team];
        let idx = self.on_deck[self.active_team];
        let player = team.get(idx).unwrap_or_else(|| {
            panic!(
                "rotation points past team {} (index {}, size {})",
                self.active_team,
                idx,
                team.len()
            )
        });
        TurnOwner {
            team: self.active_team,
            player: player.clone(),
        }
    }

    /// Rotate to the next turn: the active team's on-deck pointer moves on,
    /// then the next non-empty team becomes active.
    pub fn advance(&mut self) -> TurnOwner {
        let size = self.teams[self.active_team].len();
        if size > 0 {
            self.on_deck[self.active_team] = (self.on_deck[self.active_team] + 1) % size;
        }
        self.active_team = self.next_non_empty_team(self.active_team);
        self.current()
    }

    fn next_non_empty_team(&self, from: usize) -> usize {
        let count = self.teams.len();
        (1..=count)
            .map(|step| (from + step) % count)
            .find(|&t| !self.teams[t].is_empty())
            .expect("roster has no players left")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }

    /// (team index, index within team) of a player
    pub fn locate(&self, name: &str) -> Option<(usize, usize)> {
        self.teams.iter().enumerate().find_map(|(t, players)| {
            players
                .iter()
                .position(|p| p == name)
                .map(|idx| (t, idx))
        })
    }

    pub fn add_player(&mut self, team: usize, name: &str) -> GameResult<PlayerName> {
        if team >= self.teams.len() {
            return Err(GameError::InvalidTeam {
                index: team,
                team_count: self.teams.len(),
            });
        }
        let name = validate_name(name)?;
        if self.contains(&name) {
            return Err(GameError::DuplicateName(name));
        }
        self.teams[team].push(name.clone());
        Ok(name)
    }

    /// Remove a player, keeping every on-deck pointer on the same person
    /// (or on the next one in line when the removed player was on deck).
    pub fn remove_player(&mut self, name: &str) -> GameResult<()> {
        let (team, idx) = self
            .locate(name)
            .ok_or_else(|| GameError::NotFound(format!("Player not found: {}", name)))?;
        if self.player_count() == 1 {
            return Err(GameError::InvalidState(
                "Cannot remove the last player of the game".to_string(),
            ));
        }

        self.teams[team].remove(idx);
        let size = self.teams[team].len();
        let on_deck = &mut self.on_deck[team];
        if idx < *on_deck {
            *on_deck -= 1;
        }
        if *on_deck >= size {
            *on_deck = 0;
        }

        if self.teams[self.active_team].is_empty() {
            self.active_team = self.next_non_empty_team(self.active_team);
        }
        Ok(())
    }

    pub fn teams(&self) -> &[Vec<PlayerName>] {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn active_team(&self) -> usize {
        self.active_team
    }

    pub fn on_deck(&self) -> &[usize] {
        &self.on_deck
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(Vec::len).sum()
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerName> {
        self.teams.iter().flatten()
    }
}

fn validate_name(name: &str) -> GameResult<PlayerName> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GameError::Validation(
            "Player names must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
