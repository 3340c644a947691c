use thiserror::Error;

use crate::types::{Color, sq_to_coord};

fn coord(sq: &u8) -> String {
    sq_to_coord(*sq)
}

/// Why a move request was rejected. The game is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,
    #[error("no piece on {}", coord(.0))]
    EmptySquare(u8),
    #[error("piece on {} belongs to {owner}, {to_move} is to move", coord(.square))]
    NotYourPiece {
        square: u8,
        owner: Color,
        to_move: Color,
    },
    #[error("illegal move: {} -> {}", coord(.from), coord(.to))]
    IllegalMove { from: u8, to: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    MissingFields(usize),
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} describes {files} files")]
    RankWidth { rank: usize, files: usize },
    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),
    #[error("invalid side to move '{0}'")]
    InvalidSideToMove(String),
    #[error("invalid castling field '{0}'")]
    InvalidCastling(String),
    #[error("invalid en passant square '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UciMoveError {
    #[error("move '{0}' must be 4 or 5 characters")]
    Length(String),
    #[error("invalid file '{1}' in move '{0}'")]
    File(String, char),
    #[error("invalid rank '{1}' in move '{0}'")]
    Rank(String, char),
    #[error("invalid promotion piece '{1}' in move '{0}'")]
    Promotion(String, char),
}
