//! Async client for external engines speaking the Universal Chess Interface.
//!
//! ```no_run
//! # async fn demo() -> Result<(), uci_client::EngineError> {
//! use uci_client::{EngineConfig, GoLimits, UciEngine};
//!
//! let engine = UciEngine::spawn(EngineConfig::default())?;
//! engine.initialize().await?;
//! let reply = engine
//!     .best_move(chess_core::STARTPOS_FEN, GoLimits::movetime(200))
//!     .await?;
//! println!("{reply:?}");
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod limits;
pub mod protocol;

pub use config::EngineConfig;
pub use engine::{EngineState, UciEngine};
pub use error::EngineError;
pub use limits::GoLimits;
