//! Sequences a move across the rules engine, the animation system and the
//! engine opponent.
//!
//! The game state is committed first; the matching animation plan is queued
//! and started on the next [`Orchestrator::tick`]. Engine requests run on
//! the tokio runtime and are polled from `tick` so the frame loop never
//! blocks on them.

use std::sync::Arc;

use chess_core::{
    ChessGame, Color, GameStateSnapshot, MoveError, MoveOutcome, PieceKind, UciMove, Winner,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uci_client::{EngineError, GoLimits};

use crate::animation::AnimationSystem;
use crate::config::{AnimationConfig, AppConfig};
use crate::engine::MoveEngine;
use crate::plan::{AnimationPlan, plan_move};
use crate::scene::{PieceInstance, Renderer, SceneFrame, square_center};
use crate::selection::{ClickAction, Selection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("it is the engine's turn")]
    EngineTurn,
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Everything a UI needs to show about the current game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestratorSnapshot {
    pub game: GameStateSnapshot,
    pub fen: String,
    pub selected: Option<u8>,
    pub single_player: bool,
    pub engine_color: Color,
    pub engine_thinking: bool,
    pub animating: bool,
    pub status: Option<String>,
}

struct EngineRequest {
    generation: u64,
    task: JoinHandle<()>,
    rx: oneshot::Receiver<Result<Option<UciMove>, EngineError>>,
}

pub struct Orchestrator {
    game: ChessGame,
    animation: AnimationConfig,
    limits: GoLimits,
    selection: Selection,
    animations: AnimationSystem,
    /// Captured pieces still playing their capture animation
    departing: Vec<PieceInstance>,
    queued: Vec<AnimationPlan>,
    engine: Option<Arc<dyn MoveEngine>>,
    single_player: bool,
    engine_color: Color,
    request: Option<EngineRequest>,
    generation: u64,
    needs_new_game: bool,
    status: Option<String>,
    dirty: bool,
}

impl Orchestrator {
    /// Without an engine the game is always two-player.
    pub fn new(config: &AppConfig, engine: Option<Arc<dyn MoveEngine>>) -> Self {
        let single_player = config.game.single_player && engine.is_some();
        Self {
            game: ChessGame::new(),
            animation: config.animation.clone(),
            limits: config.engine.default_limits(),
            selection: Selection::Idle,
            animations: AnimationSystem::new(),
            departing: Vec::new(),
            queued: Vec::new(),
            engine,
            single_player,
            engine_color: config.game.engine_color,
            request: None,
            generation: 0,
            needs_new_game: true,
            status: None,
            dirty: true,
        }
    }

    pub fn game(&self) -> &ChessGame {
        &self.game
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_single_player(&self) -> bool {
        self.single_player
    }

    pub fn engine_thinking(&self) -> bool {
        self.request.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.animations.is_animating() || !self.queued.is_empty()
    }

    /// True while anything is still in motion or an engine reply is owed.
    pub fn is_busy(&self) -> bool {
        self.is_animating() || self.engine_thinking()
    }

    /// Start the engine on its move if the game is set up that way, for
    /// instance when the engine plays White.
    pub fn start(&mut self) {
        self.maybe_trigger_engine_move();
    }

    pub fn snapshot(&self) -> OrchestratorSnapshot {
        OrchestratorSnapshot {
            game: self.game.state(),
            fen: self.game.fen(),
            selected: self.selection.square(),
            single_player: self.single_player,
            engine_color: self.engine_color,
            engine_thinking: self.engine_thinking(),
            animating: self.is_animating(),
            status: self.status.clone(),
        }
    }

    fn is_engine_turn(&self) -> bool {
        self.single_player && self.game.current_player() == self.engine_color
    }

    /// Handle a click on `square`. Returns `None` when clicks are ignored.
    pub fn click(&mut self, square: u8) -> Option<ClickAction> {
        if self.is_animating()
            || self.game.winner().is_some()
            || self.is_engine_turn()
            || self.engine_thinking()
        {
            return None;
        }

        let action = self.selection.click(&mut self.game, square);
        self.dirty = true;
        if let ClickAction::Attempt { from, to } = action
            && let Err(e) = self.submit_move(from, to, None)
        {
            // Targets come from the legal move list
            debug!(error = %e, "click move rejected");
        }
        Some(action)
    }

    /// Play a move for the human side. Promotion defaults to a queen.
    pub fn submit_move(
        &mut self,
        from: u8,
        to: u8,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, SubmitError> {
        if self.is_engine_turn() || self.engine_thinking() {
            return Err(SubmitError::EngineTurn);
        }
        let outcome = self.commit(from, to, promotion)?;
        self.maybe_trigger_engine_move();
        Ok(outcome)
    }

    fn commit(
        &mut self,
        from: u8,
        to: u8,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, MoveError> {
        let before = self.game.pieces();
        let outcome = self.game.move_with_promotion(from, to, promotion)?;
        debug!(notation = %outcome.notation, "move committed");

        let plan = plan_move(&before, &self.game.pieces(), &outcome, &self.animation);
        self.queued.push(plan);
        self.selection.clear();
        self.dirty = true;

        if let Some(winner) = outcome.winner {
            let status = match winner {
                Winner::White => "Checkmate, White wins",
                Winner::Black => "Checkmate, Black wins",
                Winner::Draw => "Stalemate, draw",
            };
            info!(status, "game over");
            self.status = Some(status.to_string());
        }
        Ok(outcome)
    }

    fn maybe_trigger_engine_move(&mut self) {
        if self.game.winner().is_some() || self.request.is_some() || !self.is_engine_turn() {
            return;
        }
        let Some(engine) = self.engine.clone() else {
            return;
        };

        let fen = self.game.fen();
        let limits = self.limits;
        let new_game = std::mem::take(&mut self.needs_new_game);
        let (tx, rx) = oneshot::channel();
        debug!(%fen, new_game, "requesting engine move");
        let task = tokio::spawn(async move {
            let result = async {
                if new_game {
                    engine.new_game().await?;
                }
                engine.best_move(&fen, limits).await
            }
            .await;
            // Dropped receiver means the request was abandoned
            let _ = tx.send(result);
        });

        self.request = Some(EngineRequest {
            generation: self.generation,
            task,
            rx,
        });
        self.dirty = true;
    }

    fn poll_engine(&mut self) {
        let Some(request) = self.request.as_mut() else {
            return;
        };
        let result = match request.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(EngineError::Closed),
        };
        let generation = request.generation;
        self.request = None;
        self.dirty = true;
        if generation != self.generation {
            return;
        }

        match result {
            Ok(Some(mv)) => {
                if let Err(e) = self.commit(mv.from, mv.to, mv.promotion) {
                    self.engine_failed(format!("engine move {mv} rejected: {e}"));
                }
            }
            Ok(None) => self.engine_failed("engine returned no move".to_string()),
            Err(e) => self.engine_failed(format!("engine error: {e}")),
        }
    }

    /// Fall back to two-player mode, leaving the board as it is.
    fn engine_failed(&mut self, message: String) {
        warn!(%message, "engine unavailable, switching to two-player mode");
        self.single_player = false;
        self.status = Some(message);
        self.dirty = true;
    }

    /// Advance one frame: collect an engine reply, start queued plans, step
    /// the animations and redraw when something changed.
    pub fn tick(&mut self, dt: f32, renderer: &mut dyn Renderer) {
        self.poll_engine();

        for plan in std::mem::take(&mut self.queued) {
            let removed = self.animations.finish_all(renderer);
            self.retire(&removed);
            self.departing.extend(plan.departing);
            renderer.present(&self.frame());
            for (id, square) in plan.moved {
                renderer.set_piece_position(id, square_center(square));
            }
            for anim in plan.animations {
                self.animations.start(anim, renderer);
            }
            self.dirty = false;
        }

        let removed = self.animations.tick(dt, renderer);
        if !removed.is_empty() {
            self.retire(&removed);
            self.dirty = true;
        }

        if self.dirty {
            renderer.present(&self.frame());
            self.dirty = false;
        }
    }

    /// New game from the starting position. Any engine request in flight is
    /// abandoned and animations are dropped.
    pub fn reset(&mut self, renderer: &mut dyn Renderer) {
        if let Some(request) = self.request.take() {
            request.task.abort();
        }
        self.generation += 1;
        self.needs_new_game = true;
        self.game.reset();
        self.selection.clear();
        self.animations.clear(renderer);
        self.departing.clear();
        self.queued.clear();
        self.status = None;
        self.dirty = true;
        info!("new game");
        self.maybe_trigger_engine_move();
    }

    fn retire(&mut self, removed: &[u32]) {
        self.departing.retain(|p| !removed.contains(&p.id));
    }

    fn frame(&self) -> SceneFrame {
        SceneFrame::build(&self.game, &self.selection, &self.departing)
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if let Some(request) = self.request.take() {
            request.task.abort();
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
