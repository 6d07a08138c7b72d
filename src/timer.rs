//! Turn clock driver
//!
//! One background task per game delivers a tick every `tick_interval` while a
//! turn is running. Ticks carry the turn number they were started for, so a
//! task that outlives its turn can only ever produce stale no-op ticks.

use crate::game::TickOutcome;
use crate::state::AppState;
use tokio::time::{interval_at, Instant};

impl AppState {
    /// Start counting down `turn_no`, replacing any clock already running
    pub async fn start_turn_clock(&self, game_id: &str, turn_no: u64) {
        let state = self.clone();
        let id = game_id.to_string();
        let period = self.config.tick_interval;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                match state.tick_clock(&id, turn_no).await {
                    TickOutcome::Running(left) => {
                        tracing::debug!("Game {}: turn {} has {}s left", id, turn_no, left);
                    }
                    TickOutcome::Expired => {
                        tracing::info!("Game {}: turn {} ran out of time", id, turn_no);
                        break;
                    }
                    TickOutcome::Stale => break,
                }
            }
        });

        let previous = self
            .turn_clocks
            .lock()
            .await
            .insert(game_id.to_string(), task.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Forget the clock of a game whose turn just ran out. The task is
    /// finishing on its own, so it is not aborted.
    pub(crate) async fn release_turn_clock(&self, game_id: &str) {
        self.turn_clocks.lock().await.remove(game_id);
    }

    /// Stop the clock of a game, if one is running
    pub async fn cancel_turn_clock(&self, game_id: &str) {
        if let Some(handle) = self.turn_clocks.lock().await.remove(game_id) {
            handle.abort();
            tracing::debug!("Game {}: turn clock stopped", game_id);
        }
    }
}
