use chess_core::UciMoveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine did not answer '{0}' in time")]
    Timeout(&'static str),
    #[error("engine has not been initialized")]
    NotInitialized,
    #[error("engine is unavailable after a failed handshake")]
    Unavailable,
    #[error("search was stopped")]
    Stopped,
    #[error("engine connection closed")]
    Closed,
    #[error("unexpected engine output: {0}")]
    Protocol(String),
    #[error("engine sent an invalid move: {0}")]
    InvalidMove(#[from] UciMoveError),
}
