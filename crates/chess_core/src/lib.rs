//! Chess rules for the 3D board: board model, make/unmake, legal move
//! generation, game state with check / mate / stalemate detection, FEN and
//! UCI move strings.
//!
//! Square index is `row * 8 + col` with row 0 being rank 8.

pub mod attacks;
pub mod board;
pub mod error;
pub mod fen;
pub mod game;
pub mod makemove;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod types;
pub mod uci;

pub use attacks::{is_king_in_check, is_square_attacked};
pub use board::Board;
pub use error::{FenError, MoveError, UciMoveError};
pub use fen::STARTPOS_FEN;
pub use game::*;
pub use makemove::{MoveApplication, apply, undo};
pub use movegen::*;
pub use perft::perft;
pub use types::*;
pub use uci::*;
