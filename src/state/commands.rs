use super::AppState;
use crate::error::GameResult;
use crate::game::{Game, TickOutcome};
use crate::protocol::{ClientMessage, GameSnapshot};

impl AppState {
    /// Apply one client command to a game.
    ///
    /// The game's write lock is held for the whole transition, including
    /// starting or stopping its clock, so ticks and other commands observe
    /// either the state before or the state after.
    pub async fn apply(&self, game_id: &str, msg: ClientMessage) -> GameResult<GameSnapshot> {
        if let ClientMessage::FetchState = msg {
            return self.snapshot(game_id).await;
        }

        let handle = self.game_handle(game_id).await?;
        let mut game = handle.write().await;

        let kind = msg.kind();
        let turn_before = game.turn_no();
        if let Err(e) = execute(&mut game, msg) {
            tracing::debug!("Game {}: {} rejected: {}", game_id, kind, e);
            return Err(e);
        }
        let version = game.bump_version();

        if game.clock_running() {
            if game.turn_no() != turn_before {
                self.start_turn_clock(game_id, game.turn_no()).await;
            }
        } else {
            self.cancel_turn_clock(game_id).await;
        }

        let snapshot = game.snapshot();
        drop(game);

        self.notify_changed(game_id, version);
        Ok(snapshot)
    }

    /// Deliver one clock second to `turn_no` of a game
    pub async fn tick_clock(&self, game_id: &str, turn_no: u64) -> TickOutcome {
        let Ok(handle) = self.game_handle(game_id).await else {
            return TickOutcome::Stale;
        };
        let mut game = handle.write().await;

        let outcome = game.tick(turn_no);
        if outcome == TickOutcome::Stale {
            return outcome;
        }
        if outcome == TickOutcome::Expired {
            // removed under the game lock so a newer turn's clock stays put
            self.release_turn_clock(game_id).await;
        }
        let version = game.bump_version();
        drop(game);

        self.notify_changed(game_id, version);
        outcome
    }
}

fn execute(game: &mut Game, msg: ClientMessage) -> GameResult<()> {
    match msg {
        ClientMessage::FetchState => Ok(()),
        ClientMessage::SubmitPhrases { player, phrases } => game.submit_phrases(&player, phrases),
        ClientMessage::StartTurn { player } => game.start_turn(&player).map(|_| ()),
        ClientMessage::MarkPhraseClicked { player, phrase } => game.mark_clicked(&player, &phrase),
        ClientMessage::EndTurn { player } => game.end_turn(&player),
        ClientMessage::ConfirmPhrases { player, phrases } => {
            game.confirm_phrases(&player, &phrases).map(|_| ())
        }
        ClientMessage::HostSkipPlayer { player, target } => {
            tracing::info!("Game {}: {} skips {}", game.id(), player, target);
            game.skip(&target)
        }
        ClientMessage::HostAddPlayer {
            player,
            team_index,
            name,
        } => {
            tracing::info!("Game {}: {} adds {}", game.id(), player, name);
            game.add_player(team_index, &name).map(|_| ())
        }
        ClientMessage::HostRemovePlayer { player, name } => {
            tracing::info!("Game {}: {} removes {}", game.id(), player, name);
            game.remove_player(&name)
        }
    }
}
