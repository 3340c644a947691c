//! Adapter behaviour against scripted in-memory engines.

use std::sync::Arc;
use std::time::Duration;

use chess_core::{STARTPOS_FEN, coord_to_sq};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::timeout;

use uci_client::{EngineConfig, EngineError, EngineState, GoLimits, UciEngine};

enum Reply {
    Lines(Vec<&'static str>),
    Later(Duration, Vec<&'static str>),
    Hangup,
}

fn silent() -> Reply {
    Reply::Lines(Vec::new())
}

/// Connect an adapter to a fake engine driven by `script`. Every command the
/// fake receives is forwarded to the returned channel before it replies.
fn fake_engine<F>(config: EngineConfig, mut script: F) -> (UciEngine, mpsc::UnboundedReceiver<String>)
where
    F: FnMut(&str) -> Reply + Send + 'static,
{
    let (client, server) = tokio::io::duplex(4096);
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (rd, mut wr) = tokio::io::split(server);
        let mut lines = BufReader::new(rd).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let reply = script(&line);
            let _ = seen_tx.send(line);
            let out = match reply {
                Reply::Lines(out) => out,
                Reply::Later(delay, out) => {
                    tokio::time::sleep(delay).await;
                    out
                }
                Reply::Hangup => return,
            };
            for l in out {
                if wr.write_all(format!("{l}\n").as_bytes()).await.is_err() {
                    return;
                }
            }
        }
    });

    let (rd, wr) = tokio::io::split(client);
    (UciEngine::from_transport(rd, wr, config), seen_rx)
}

fn stockfish(line: &str) -> Reply {
    match line.split_whitespace().next() {
        Some("uci") => Reply::Lines(vec![
            "id name Fakefish",
            "id author tests",
            "option name Skill Level type spin default 20 min 0 max 20",
            "uciok",
        ]),
        Some("isready") => Reply::Lines(vec!["readyok"]),
        Some("go") => Reply::Lines(vec![
            "info depth 1 score cp 13 pv e2e4",
            "bestmove e2e4 ponder e7e5",
        ]),
        _ => silent(),
    }
}

fn drain(seen: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(line) = seen.try_recv() {
        out.push(line);
    }
    out
}

async fn wait_for_command(seen: &mut mpsc::UnboundedReceiver<String>, prefix: &str) {
    timeout(Duration::from_secs(2), async {
        while let Some(line) = seen.recv().await {
            if line.starts_with(prefix) {
                return;
            }
        }
        panic!("fake engine stopped before receiving '{prefix}'");
    })
    .await
    .expect("command never arrived");
}

fn sq(c: &str) -> u8 {
    coord_to_sq(c).unwrap()
}

#[tokio::test]
async fn handshake_sends_options_and_reaches_ready() {
    let config = EngineConfig {
        skill_level: 5,
        ..EngineConfig::default()
    };
    let (engine, mut seen) = fake_engine(config, stockfish);
    assert_eq!(engine.state(), EngineState::Uninitialized);

    engine.initialize().await.unwrap();
    assert_eq!(engine.state(), EngineState::Ready);
    assert_eq!(
        drain(&mut seen),
        vec![
            "uci",
            "setoption name Skill Level value 5",
            "setoption name Threads value 1",
            "isready",
        ]
    );

    // A second call is a no-op
    engine.initialize().await.unwrap();
    assert!(drain(&mut seen).is_empty());
}

#[tokio::test]
async fn best_move_sends_position_and_limits() {
    let (engine, mut seen) = fake_engine(EngineConfig::default(), stockfish);
    engine.initialize().await.unwrap();
    drain(&mut seen);

    let mv = engine
        .best_move(STARTPOS_FEN, GoLimits::depth(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!((mv.from, mv.to), (sq("e2"), sq("e4")));
    assert_eq!(
        drain(&mut seen),
        vec![format!("position fen {STARTPOS_FEN}"), "go depth 3".to_string()]
    );
}

#[tokio::test]
async fn empty_limits_use_configured_defaults() {
    let config = EngineConfig {
        movetime_ms: Some(250),
        ..EngineConfig::default()
    };
    let (engine, mut seen) = fake_engine(config, stockfish);
    engine.initialize().await.unwrap();
    drain(&mut seen);

    engine
        .best_move(STARTPOS_FEN, GoLimits::default())
        .await
        .unwrap();
    assert_eq!(drain(&mut seen).last().unwrap(), "go movetime 250");
}

#[tokio::test]
async fn request_during_handshake_waits_for_it() {
    let (engine, mut seen) = fake_engine(EngineConfig::default(), |line: &str| {
        if line == "uci" {
            Reply::Later(Duration::from_millis(50), vec!["uciok"])
        } else {
            stockfish(line)
        }
    });

    let (init, best) = tokio::join!(
        engine.initialize(),
        engine.best_move(STARTPOS_FEN, GoLimits::depth(1)),
    );
    init.unwrap();
    assert!(best.unwrap().is_some());

    let commands = drain(&mut seen);
    let ready = commands.iter().position(|c| c == "isready").unwrap();
    let position = commands
        .iter()
        .position(|c| c.starts_with("position"))
        .unwrap();
    assert!(ready < position, "search raced the handshake: {commands:?}");
}

#[tokio::test]
async fn no_legal_move_reply_is_none() {
    let (engine, _seen) = fake_engine(EngineConfig::default(), |line: &str| {
        if line.starts_with("go") {
            Reply::Lines(vec!["bestmove (none)"])
        } else {
            stockfish(line)
        }
    });
    engine.initialize().await.unwrap();
    let reply = engine
        .best_move("k7/2Q5/8/8/8/8/8/1K6 b - - 0 1", GoLimits::depth(1))
        .await
        .unwrap();
    assert!(reply.is_none());
}

#[tokio::test]
async fn stop_rejects_once_and_swallows_stale_reply() {
    let mut searches = 0;
    let (engine, mut seen) = fake_engine(EngineConfig::default(), move |line: &str| {
        match line.split_whitespace().next() {
            Some("go") => {
                searches += 1;
                if searches == 1 {
                    // Think until told to stop
                    silent()
                } else {
                    Reply::Lines(vec!["bestmove d2d4"])
                }
            }
            Some("stop") => Reply::Lines(vec!["bestmove a2a3"]),
            _ => stockfish(line),
        }
    });
    let engine = Arc::new(engine);
    engine.initialize().await.unwrap();

    let first = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.best_move(STARTPOS_FEN, GoLimits::depth(30)).await }
    });
    wait_for_command(&mut seen, "go").await;

    engine.stop().await.unwrap();
    assert!(matches!(first.await.unwrap(), Err(EngineError::Stopped)));

    // Nothing left to stop
    engine.stop().await.unwrap();

    let mv = engine
        .best_move(STARTPOS_FEN, GoLimits::depth(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!((mv.from, mv.to), (sq("d2"), sq("d4")));

    let stops = drain(&mut seen).iter().filter(|c| *c == "stop").count();
    assert_eq!(stops, 1);
}

#[tokio::test]
async fn abandoned_request_does_not_block_the_next_one() {
    // A tiny pipe so the position line cannot be written in one go
    let (client, server) = tokio::io::duplex(16);
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
    let (seen_tx, mut seen) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (rd, mut wr) = tokio::io::split(server);
        let mut lines = BufReader::new(rd).lines();
        let mut release = Some(release_rx);
        let mut searches = 0;
        while let Ok(Some(line)) = lines.next_line().await {
            let out = match line.split_whitespace().next() {
                Some("go") => {
                    searches += 1;
                    if searches == 1 {
                        vec!["bestmove a2a3"]
                    } else {
                        vec!["bestmove e2e4"]
                    }
                }
                _ => match stockfish(&line) {
                    Reply::Lines(out) => out,
                    _ => Vec::new(),
                },
            };
            let ready = line == "isready";
            let _ = seen_tx.send(line);
            for l in out {
                if wr.write_all(format!("{l}\n").as_bytes()).await.is_err() {
                    return;
                }
            }
            // Stop reading after the handshake until the test lets go
            if ready && let Some(rx) = release.take() {
                let _ = rx.await;
            }
        }
    });

    let (rd, wr) = tokio::io::split(client);
    let engine = Arc::new(UciEngine::from_transport(rd, wr, EngineConfig::default()));
    engine.initialize().await.unwrap();
    drain(&mut seen);

    let abandoned = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.best_move(STARTPOS_FEN, GoLimits::depth(5)).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    abandoned.abort();
    assert!(abandoned.await.unwrap_err().is_cancelled());
    release_tx.send(()).unwrap();

    let mv = timeout(
        Duration::from_secs(2),
        engine.best_move(STARTPOS_FEN, GoLimits::depth(1)),
    )
    .await
    .expect("second request hung")
    .unwrap()
    .unwrap();
    assert_eq!((mv.from, mv.to), (sq("e2"), sq("e4")));

    // The interrupted line still reached the engine whole
    let commands = drain(&mut seen);
    assert_eq!(commands[0], format!("position fen {STARTPOS_FEN}"));
    assert_eq!(commands[1], "go depth 5");
    assert!(commands.ends_with(&["go depth 1".to_string()]));
}

#[tokio::test]
async fn new_game_resets_engine_state() {
    let (engine, mut seen) = fake_engine(EngineConfig::default(), stockfish);
    engine.initialize().await.unwrap();
    drain(&mut seen);

    engine.new_game().await.unwrap();
    assert_eq!(drain(&mut seen), vec!["ucinewgame", "isready"]);
}

#[tokio::test]
async fn eof_rejects_pending_requests() {
    let (engine, _seen) = fake_engine(EngineConfig::default(), |line: &str| {
        if line.starts_with("go") {
            Reply::Hangup
        } else {
            stockfish(line)
        }
    });
    engine.initialize().await.unwrap();

    let res = engine.best_move(STARTPOS_FEN, GoLimits::depth(1)).await;
    assert!(matches!(res, Err(EngineError::Closed)));
    assert_eq!(engine.state(), EngineState::Closed);

    let again = engine.best_move(STARTPOS_FEN, GoLimits::depth(1)).await;
    assert!(matches!(again, Err(EngineError::Closed)));
}

#[tokio::test]
async fn malformed_best_move_is_an_error() {
    let (engine, _seen) = fake_engine(EngineConfig::default(), |line: &str| {
        if line.starts_with("go") {
            Reply::Lines(vec!["bestmove zz11"])
        } else {
            stockfish(line)
        }
    });
    engine.initialize().await.unwrap();

    let res = engine.best_move(STARTPOS_FEN, GoLimits::depth(1)).await;
    assert!(matches!(res, Err(EngineError::InvalidMove(_))));
    // The connection itself is still usable
    assert_eq!(engine.state(), EngineState::Ready);
}

#[tokio::test]
async fn handshake_timeout_marks_engine_failed() {
    let config = EngineConfig {
        handshake_timeout_ms: 50,
        ..EngineConfig::default()
    };
    let (engine, _seen) = fake_engine(config, |_: &str| silent());

    let res = engine.initialize().await;
    assert!(matches!(res, Err(EngineError::Timeout("uci"))));
    assert_eq!(engine.state(), EngineState::Failed);

    let best = engine.best_move(STARTPOS_FEN, GoLimits::depth(1)).await;
    assert!(matches!(best, Err(EngineError::Unavailable)));
    assert!(matches!(
        engine.initialize().await,
        Err(EngineError::Unavailable)
    ));
}

#[tokio::test]
async fn requests_before_initialize_are_rejected() {
    let (engine, _seen) = fake_engine(EngineConfig::default(), stockfish);
    let res = engine.best_move(STARTPOS_FEN, GoLimits::depth(1)).await;
    assert!(matches!(res, Err(EngineError::NotInitialized)));
    assert!(matches!(
        engine.new_game().await,
        Err(EngineError::NotInitialized)
    ));
}

#[tokio::test]
async fn shutdown_sends_quit() {
    let (engine, mut seen) = fake_engine(EngineConfig::default(), stockfish);
    engine.initialize().await.unwrap();
    drain(&mut seen);

    engine.shutdown().await;
    assert_eq!(engine.state(), EngineState::Closed);
    wait_for_command(&mut seen, "quit").await;
}

#[tokio::test]
async fn missing_executable_fails_to_spawn() {
    let config = EngineConfig {
        path: "/nonexistent/chess-engine".to_string(),
        ..EngineConfig::default()
    };
    let res = UciEngine::spawn(config);
    assert!(matches!(res, Err(EngineError::Spawn { .. })));
}
