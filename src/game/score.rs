use serde::Serialize;

/// Confirmed-phrase counts per team, parallel to the roster's teams
#[derive(Debug, Clone, Serialize)]
pub struct Scoreboard {
    scores: Vec<u32>,
    #[serde(rename = "final")]
    frozen: bool,
}

impl Scoreboard {
    pub fn new(team_count: usize) -> Self {
        Self {
            scores: vec![0; team_count],
            frozen: false,
        }
    }

    pub fn credit(&mut self, team: usize, phrases: usize) {
        assert!(!self.frozen, "scoreboard credited after the game finished");
        let phrases = u32::try_from(phrases).expect("phrase count overflows u32");
        self.scores[team] += phrases;
    }

    /// Scores are final once the last round is over
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_final(&self) -> bool {
        self.frozen
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Index of the leading team, `None` on a tie for first place
    pub fn leader(&self) -> Option<usize> {
        let best = *self.scores.iter().max()?;
        let mut leaders = self
            .scores
            .iter()
            .enumerate()
            .filter(|(_, &s)| s == best)
            .map(|(idx, _)| idx);
        match (leaders.next(), leaders.next()) {
            (Some(idx), None) => Some(idx),
            _ => None,
        }
    }
}
