//! The opponent as seen by the orchestrator.

use async_trait::async_trait;
use chess_core::UciMove;
use uci_client::{EngineError, GoLimits, UciEngine};

/// Something that can pick moves for one side. `Ok(None)` means the engine
/// has no move to offer in that position.
#[async_trait]
pub trait MoveEngine: Send + Sync {
    async fn new_game(&self) -> Result<(), EngineError>;
    async fn best_move(&self, fen: &str, limits: GoLimits) -> Result<Option<UciMove>, EngineError>;
}

#[async_trait]
impl MoveEngine for UciEngine {
    async fn new_game(&self) -> Result<(), EngineError> {
        UciEngine::new_game(self).await
    }

    async fn best_move(&self, fen: &str, limits: GoLimits) -> Result<Option<UciMove>, EngineError> {
        UciEngine::best_move(self, fen, limits).await
    }
}
