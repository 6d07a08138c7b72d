use hatgame::config::ServerConfig;
use hatgame::protocol::{ClientMessage, CreateGameRequest, GameSnapshot, ServerMessage};
use hatgame::state::AppState;
use hatgame::types::{MainPhase, Role, SubPhase, TurnEnd};
use hatgame::ws::handlers::handle_message;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn names(team: &[&str]) -> Vec<String> {
    team.iter().map(|s| s.to_string()).collect()
}

async fn create(state: &Arc<AppState>, id: &str, teams: &[&[&str]], per_player: usize, seconds: u32) {
    state
        .create_game(CreateGameRequest {
            id: Some(id.to_string()),
            teams: teams.iter().map(|t| names(t)).collect(),
            phrases_per_player: per_player,
            seconds_per_turn: seconds,
            video_url: None,
            shuffle_hat: Some(false),
        })
        .await
        .expect("game should be created");
}

/// Send a command that must succeed and return the new snapshot
async fn ok(state: &Arc<AppState>, role: Role, msg: ClientMessage) -> GameSnapshot {
    match handle_message(msg, &role, "g", state).await {
        ServerMessage::State { game } => game,
        other => panic!("Expected State message, got {:?}", other),
    }
}

/// Send a command that must fail and return its error code
async fn err(state: &Arc<AppState>, role: Role, msg: ClientMessage) -> String {
    match handle_message(msg, &role, "g", state).await {
        ServerMessage::Error { code, .. } => code,
        other => panic!("Expected Error message, got {:?}", other),
    }
}

async fn write_all(state: &Arc<AppState>, teams: &[&[&str]], per_player: usize) -> GameSnapshot {
    let mut last = None;
    for player in teams.iter().flat_map(|t| t.iter()) {
        let phrases = (1..=per_player).map(|i| format!("{}-{}", player, i)).collect();
        last = Some(
            ok(
                state,
                Role::Player,
                ClientMessage::SubmitPhrases {
                    player: player.to_string(),
                    phrases,
                },
            )
            .await,
        );
    }
    last.expect("at least one player")
}

fn start(player: &str) -> ClientMessage {
    ClientMessage::StartTurn {
        player: player.to_string(),
    }
}

fn click(player: &str, phrase: &str) -> ClientMessage {
    ClientMessage::MarkPhraseClicked {
        player: player.to_string(),
        phrase: phrase.to_string(),
    }
}

fn end(player: &str) -> ClientMessage {
    ClientMessage::EndTurn {
        player: player.to_string(),
    }
}

fn confirm(player: &str, phrases: &[String]) -> ClientMessage {
    ClientMessage::ConfirmPhrases {
        player: player.to_string(),
        phrases: phrases.to_vec(),
    }
}

/// End-to-end: writing, three rounds, final scores
#[tokio::test]
async fn test_full_game_flow() {
    let state = Arc::new(AppState::new());
    let teams: &[&[&str]] = &[&["ann", "bea"], &["cal", "dan"]];
    create(&state, "g", teams, 2, 60).await;

    let snap = write_all(&state, teams, 2).await;
    assert_eq!(snap.main_phase, MainPhase::MultiWordClue);
    assert_eq!(snap.sub_phase, SubPhase::WaitForStart);
    assert_eq!(snap.hat_size, 8);
    assert_eq!(snap.active_player.as_deref(), Some("ann"));

    let mut phases_seen = vec![snap.main_phase];
    let mut snap = snap;
    let mut turns = 0;
    while snap.main_phase != MainPhase::Done {
        let player = snap.active_player.clone().expect("someone is on turn");
        snap = ok(&state, Role::Player, start(&player)).await;
        assert_eq!(snap.sub_phase, SubPhase::Started);

        // three phrases per turn, then stop
        for _ in 0..3 {
            if snap.sub_phase != SubPhase::Started {
                break;
            }
            let next = snap.phrases_on_display[0].clone();
            snap = ok(&state, Role::Player, click(&player, &next)).await;
        }
        if snap.sub_phase == SubPhase::Started {
            snap = ok(&state, Role::Player, end(&player)).await;
        }
        assert_eq!(snap.sub_phase, SubPhase::ConfirmingPhrases);

        let clicked = snap.clicked_phrases.clone();
        snap = ok(&state, Role::Player, confirm(&player, &clicked)).await;
        assert_eq!(snap.sub_phase, SubPhase::WaitForStart);
        if phases_seen.last() != Some(&snap.main_phase) {
            phases_seen.push(snap.main_phase);
        }
        turns += 1;
        assert!(turns < 100, "game did not finish");
    }

    assert_eq!(
        phases_seen,
        vec![
            MainPhase::MultiWordClue,
            MainPhase::SingleWordClue,
            MainPhase::Charade,
            MainPhase::Done
        ]
    );
    assert!(snap.scores_final);
    assert_eq!(snap.scores.iter().sum::<u32>(), 24);
    assert_eq!(snap.active_player, None);

    // nothing moves once the game is over
    assert_eq!(err(&state, Role::Player, start("ann")).await, "INVALID_STATE");
}

#[tokio::test]
async fn test_two_players_two_phrases_fill_hat_with_four() {
    let state = Arc::new(AppState::new());
    let teams: &[&[&str]] = &[&["ann"], &["bob"]];
    create(&state, "g", teams, 2, 30).await;

    let snap = write_all(&state, teams, 2).await;
    assert_eq!(snap.main_phase, MainPhase::MultiWordClue);
    assert_eq!(snap.hat_size, 4);
}

#[tokio::test]
async fn test_writing_rules() {
    let state = Arc::new(AppState::new());
    create(&state, "g", &[&["ann"], &["bob"]], 2, 30).await;

    let too_few = ClientMessage::SubmitPhrases {
        player: "ann".to_string(),
        phrases: names(&["only one"]),
    };
    assert_eq!(err(&state, Role::Player, too_few).await, "VALIDATION");

    let blank = ClientMessage::SubmitPhrases {
        player: "ann".to_string(),
        phrases: names(&["fine", "   "]),
    };
    assert_eq!(err(&state, Role::Player, blank).await, "VALIDATION");

    let good = ClientMessage::SubmitPhrases {
        player: "ann".to_string(),
        phrases: names(&["one", "two"]),
    };
    let snap = ok(&state, Role::Player, good.clone()).await;
    assert_eq!(snap.player_writing_status.get("ann"), Some(&true));
    assert_eq!(snap.player_writing_status.get("bob"), Some(&false));
    assert_eq!(err(&state, Role::Player, good).await, "INVALID_STATE");

    // clue commands are not accepted until writing is done
    assert_eq!(err(&state, Role::Player, start("ann")).await, "INVALID_STATE");
}

#[tokio::test]
async fn test_rotation_across_teams() {
    let state = Arc::new(AppState::new());
    let teams: &[&[&str]] = &[&["A", "B"], &["C"]];
    create(&state, "g", teams, 3, 30).await;
    let mut snap = write_all(&state, teams, 3).await;

    let mut seq = vec![(snap.active_team_index, snap.active_player.clone().unwrap())];
    for _ in 0..3 {
        let player = snap.active_player.clone().unwrap();
        ok(&state, Role::Player, start(&player)).await;
        ok(&state, Role::Player, end(&player)).await;
        snap = ok(&state, Role::Player, confirm(&player, &[])).await;
        seq.push((snap.active_team_index, snap.active_player.clone().unwrap()));
    }

    let seq: Vec<_> = seq.iter().map(|(t, p)| (*t, p.as_str())).collect();
    assert_eq!(seq, vec![(0, "A"), (1, "C"), (0, "B"), (1, "C")]);
}

#[tokio::test]
async fn test_carry_over_seconds() {
    let state = Arc::new(AppState::new());
    let teams: &[&[&str]] = &[&["ann"], &["bob"]];
    create(&state, "g", teams, 1, 30).await;
    write_all(&state, teams, 1).await;

    let snap = ok(&state, Role::Player, start("ann")).await;
    for _ in 0..18 {
        state.tick_clock("g", snap.turn_no).await;
    }
    let mut snap = state.snapshot("g").await.unwrap();
    assert_eq!(snap.seconds_remaining, 12);

    while snap.sub_phase == SubPhase::Started {
        let next = snap.phrases_on_display[0].clone();
        snap = ok(&state, Role::Player, click("ann", &next)).await;
    }
    assert_eq!(snap.turn_end, Some(TurnEnd::HatEmptied));
    assert_eq!(snap.hat_size, 0);

    let clicked = snap.clicked_phrases.clone();
    let snap = ok(&state, Role::Player, confirm("ann", &clicked)).await;
    assert_eq!(snap.main_phase, MainPhase::SingleWordClue);
    assert_eq!(snap.active_player.as_deref(), Some("ann"));
    assert_eq!(snap.carry_over_seconds, Some(12));
    assert_eq!(snap.scores, vec![2, 0]);

    let snap = ok(&state, Role::Player, start("ann")).await;
    assert_eq!(snap.seconds_remaining, 12);
}

#[tokio::test]
async fn test_click_unknown_phrase_changes_nothing() {
    let state = Arc::new(AppState::new());
    let teams: &[&[&str]] = &[&["ann"], &["bob"]];
    create(&state, "g", teams, 2, 30).await;
    write_all(&state, teams, 2).await;
    ok(&state, Role::Player, start("ann")).await;
    let before = ok(&state, Role::Player, click("ann", "ann-1")).await;

    let code = err(&state, Role::Player, click("ann", "no such phrase")).await;
    assert_eq!(code, "NOT_FOUND");

    let after = state.snapshot("g").await.unwrap();
    assert_eq!(after.hat_size, before.hat_size);
    assert_eq!(after.clicked_phrases, before.clicked_phrases);
    assert_eq!(after.version, before.version);

    let code = err(&state, Role::Player, click("bob", "ann-2")).await;
    assert_eq!(code, "NOT_ACTIVE_PLAYER");
}

#[tokio::test]
async fn test_remove_active_player_mid_turn() {
    let state = Arc::new(AppState::new());
    let teams: &[&[&str]] = &[&["ann", "bea"], &["cal"]];
    create(&state, "g", teams, 1, 30).await;
    write_all(&state, teams, 1).await;

    ok(&state, Role::Player, start("ann")).await;
    ok(&state, Role::Player, click("ann", "ann-1")).await;

    let remove = ClientMessage::HostRemovePlayer {
        player: "cal".to_string(),
        name: "ann".to_string(),
    };
    assert_eq!(err(&state, Role::Player, remove.clone()).await, "UNAUTHORIZED");
    let snap = ok(&state, Role::Host, remove).await;

    assert_eq!(snap.sub_phase, SubPhase::WaitForStart);
    assert_eq!(snap.scores, vec![0, 0]);
    assert_eq!(snap.hat_size, 3);
    assert!(snap.clicked_phrases.is_empty());
    assert_eq!(snap.teams[0], names(&["bea"]));
    assert_eq!(snap.active_player.as_deref(), Some("cal"));

    // the clock of the forfeited turn is gone
    assert!(state.turn_clocks.lock().await.is_empty());

    ok(&state, Role::Player, start("cal")).await;
    ok(&state, Role::Player, end("cal")).await;
    let snap = ok(&state, Role::Player, confirm("cal", &[])).await;
    assert_eq!(snap.active_player.as_deref(), Some("bea"));
}

#[tokio::test]
async fn test_host_skip_returns_phrases() {
    let state = Arc::new(AppState::new());
    let teams: &[&[&str]] = &[&["ann"], &["bob"]];
    create(&state, "g", teams, 2, 30).await;
    write_all(&state, teams, 2).await;

    let skip = ClientMessage::HostSkipPlayer {
        player: "host".to_string(),
        target: "ann".to_string(),
    };
    // nothing to skip before the turn starts
    assert_eq!(err(&state, Role::Host, skip.clone()).await, "NOT_ACTIVE_PLAYER");
    let waiting = state.snapshot("g").await.unwrap();
    assert_eq!(waiting.active_player.as_deref(), Some("ann"));

    ok(&state, Role::Player, start("ann")).await;
    ok(&state, Role::Player, click("ann", "ann-1")).await;
    let snap = ok(&state, Role::Host, skip).await;

    assert_eq!(snap.sub_phase, SubPhase::WaitForStart);
    assert_eq!(snap.hat_size, 4);
    assert_eq!(snap.scores, vec![0, 0]);
    assert_eq!(snap.active_player.as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_clock_expires_turn_once() {
    let state = Arc::new(AppState::with_config(ServerConfig {
        tick_interval: Duration::from_millis(5),
        ..ServerConfig::default()
    }));
    let teams: &[&[&str]] = &[&["ann"], &["bob"]];
    create(&state, "g", teams, 2, 4).await;
    write_all(&state, teams, 2).await;

    let mut rx = state.broadcast.subscribe();
    let started = ok(&state, Role::Player, start("ann")).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    let snap = state.snapshot("g").await.unwrap();
    assert_eq!(snap.sub_phase, SubPhase::ConfirmingPhrases);
    assert_eq!(snap.turn_end, Some(TurnEnd::ClockExpired));
    assert_eq!(snap.seconds_remaining, 0);
    // one bump for the start command, one per second of the clock
    assert_eq!(snap.version, started.version + 4);

    // late ticks for the finished turn do nothing
    for _ in 0..3 {
        state.tick_clock("g", started.turn_no).await;
    }
    assert_eq!(state.snapshot("g").await.unwrap().version, snap.version);

    let mut versions = HashSet::new();
    while let Ok(msg) = rx.try_recv() {
        if let ServerMessage::StateChanged { version, .. } = msg {
            versions.insert(version);
        }
    }
    assert!(versions.contains(&snap.version));
}

#[tokio::test]
async fn test_concurrent_readers_see_whole_transitions() {
    let state = Arc::new(AppState::new());
    let teams: &[&[&str]] = &[&["ann"], &["bob"]];
    create(&state, "g", teams, 3, 30).await;
    write_all(&state, teams, 3).await;
    ok(&state, Role::Player, start("ann")).await;

    let reader = {
        let state = state.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let snap = state.snapshot("g").await.unwrap();
                // six phrases, each in exactly one place
                assert_eq!(snap.hat_size + snap.clicked_phrases.len(), 6);
                tokio::task::yield_now().await;
            }
        })
    };

    for phrase in ["ann-1", "ann-2", "ann-3"] {
        ok(&state, Role::Player, click("ann", phrase)).await;
        tokio::task::yield_now().await;
    }
    reader.await.unwrap();
}

#[tokio::test]
async fn test_unknown_game() {
    let state = Arc::new(AppState::new());
    let reply = handle_message(ClientMessage::FetchState, &Role::Display, "missing", &state).await;
    match reply {
        ServerMessage::Error { code, .. } => assert_eq!(code, "NOT_FOUND"),
        other => panic!("Expected Error message, got {:?}", other),
    }
}
