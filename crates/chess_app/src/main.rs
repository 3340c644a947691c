//! Headless driver: plays a game from stdin commands against the configured
//! UCI engine, with a renderer that only logs.
//!
//! Commands: `click <sq>`, `move <uci>`, `fen`, `state`, `history`,
//! `reset`, `quit`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chess_app::geometry::Vec3;
use chess_app::selection::ClickAction;
use chess_app::{AppConfig, MoveEngine, Orchestrator, Renderer, SceneFrame};
use chess_core::{UciMove, coord_to_sq, sq_to_coord};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;
use uci_client::{EngineConfig, EngineError, UciEngine};

const DEFAULT_CONFIG: &str = "chess_app.toml";
const FRAME: f32 = 1.0 / 60.0;

/// Renderer that writes what it is asked to draw to the log.
struct LogRenderer;

impl Renderer for LogRenderer {
    fn present(&mut self, frame: &SceneFrame) {
        debug!(
            pieces = frame.pieces.len(),
            highlights = frame.highlights.len(),
            "present"
        );
    }

    fn set_piece_position(&mut self, id: u32, position: Vec3) {
        trace!(id, ?position, "position");
    }

    fn set_piece_offset(&mut self, id: u32, offset: Vec3) {
        trace!(id, ?offset, "offset");
    }

    fn set_piece_scale(&mut self, id: u32, scale: f32) {
        trace!(id, scale, "scale");
    }

    fn set_piece_rotation_offset(&mut self, id: u32, angle: f32) {
        trace!(id, angle, "tilt");
    }

    fn remove_piece(&mut self, id: u32) {
        debug!(id, "remove");
    }
}

async fn start_engine(config: &EngineConfig) -> Result<Arc<UciEngine>, EngineError> {
    let engine = UciEngine::spawn(config.clone())?;
    if let Err(e) = engine.initialize().await {
        engine.shutdown().await;
        return Err(e);
    }
    Ok(Arc::new(engine))
}

/// Run frames until animations end and no engine reply is owed.
async fn settle(orch: &mut Orchestrator, renderer: &mut LogRenderer) {
    loop {
        orch.tick(FRAME, renderer);
        if !orch.is_busy() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
}

fn parse_square(arg: Option<&str>) -> Option<u8> {
    arg.and_then(coord_to_sq)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = AppConfig::load(&path).with_context(|| format!("loading {path}"))?;

    let uci = if config.game.single_player {
        match start_engine(&config.engine).await {
            Ok(engine) => {
                info!(path = %config.engine.path, "engine ready");
                Some(engine)
            }
            Err(e) => {
                warn!(error = %e, "engine unavailable");
                println!("engine unavailable ({e}), playing two-player");
                None
            }
        }
    } else {
        None
    };

    let engine = uci.clone().map(|e| e as Arc<dyn MoveEngine>);
    let mut orch = Orchestrator::new(&config, engine);
    let mut renderer = LogRenderer;
    orch.start();
    settle(&mut orch, &mut renderer).await;

    let mut printed = 0;
    let mut last_status = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };

        match cmd {
            "click" => match parse_square(parts.next()) {
                Some(sq) => match orch.click(sq) {
                    Some(ClickAction::Selected(from)) => {
                        let targets: Vec<String> = orch
                            .selection()
                            .targets()
                            .into_iter()
                            .map(sq_to_coord)
                            .collect();
                        println!("{} -> {}", sq_to_coord(from), targets.join(" "));
                    }
                    Some(action) => println!("{action:?}"),
                    None => println!("ignored"),
                },
                None => println!("usage: click <square>"),
            },
            "move" => match parts.next().map(str::parse::<UciMove>) {
                Some(Ok(mv)) => {
                    if let Err(e) = orch.submit_move(mv.from, mv.to, mv.promotion) {
                        println!("rejected: {e}");
                    }
                }
                Some(Err(e)) => println!("{e}"),
                None => println!("usage: move <uci>"),
            },
            "fen" => println!("{}", orch.game().fen()),
            "state" => println!("{}", serde_json::to_string_pretty(&orch.snapshot())?),
            "history" => {
                for entry in orch.game().history() {
                    println!("{entry}");
                }
            }
            "reset" => {
                orch.reset(&mut renderer);
                printed = 0;
            }
            "quit" => break,
            other => println!("unknown command '{other}'"),
        }

        settle(&mut orch, &mut renderer).await;

        let history = orch.game().history();
        for entry in history.iter().skip(printed) {
            println!("{entry}");
        }
        printed = history.len();
        let status = orch.status().map(str::to_string);
        if status != last_status {
            if let Some(s) = &status {
                println!("{s}");
            }
            last_status = status;
        }
    }

    drop(orch);
    if let Some(engine) = uci {
        engine.shutdown().await;
    }
    Ok(())
}
