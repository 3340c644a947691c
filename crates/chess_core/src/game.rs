//! Game state management: turn order, history, en passant eligibility and
//! game-end detection on top of the board and move generator.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    attacks::is_king_in_check,
    board::Board,
    error::MoveError,
    makemove::{apply, en_passant_after},
    movegen::{has_any_legal_move, legal_moves_from, legal_moves_into},
    notation::{NotationInput, describe},
    types::*,
};

/// Game result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl From<Color> for Winner {
    fn from(c: Color) -> Self {
        match c {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

/// Last committed move, kept for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastMove {
    pub from: u8,
    pub to: u8,
    pub rook: Option<(u8, u8)>,
}

/// One entry of [`ChessGame::pieces`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceInfo {
    pub index: u8,
    pub row: i8,
    pub col: i8,
    pub kind: PieceKind,
    pub color: Color,
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStateSnapshot {
    pub current_player: Color,
    pub history: Vec<String>,
    pub check: bool,
    pub winner: Option<Winner>,
    pub last_move: Option<LastMove>,
}

/// What a successful [`ChessGame::move_piece`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub mv: Move,
    pub color: Color,
    /// Kind before the move (a pawn for promotions).
    pub piece: PieceKind,
    pub piece_id: u32,
    pub captured: Option<Piece>,
    pub captured_square: Option<u8>,
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub castle: Option<CastleMove>,
    pub en_passant: bool,
    pub promotion: Option<PieceKind>,
    pub winner: Option<Winner>,
    pub notation: String,
}

/// The rules engine. Owns the board and all game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessGame {
    pub(crate) board: Board,
    pub(crate) current_player: Color,
    pub(crate) history: Vec<String>,
    pub(crate) last_move: Option<LastMove>,
    pub(crate) en_passant: Option<EnPassantTarget>,
    pub(crate) winner: Option<Winner>,
    pub(crate) check: bool,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    pub fn new() -> Self {
        Self::with_board(Board::startpos(), Color::White)
    }

    pub(crate) fn with_board(board: Board, current_player: Color) -> Self {
        Self {
            board,
            current_player,
            history: Vec::new(),
            last_move: None,
            en_passant: None,
            winner: None,
            check: false,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Back to the standard starting position with empty history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, sq: u8) -> Option<&Piece> {
        self.board.piece_at(sq)
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn en_passant_target(&self) -> Option<EnPassantTarget> {
        self.en_passant
    }

    /// Snapshot of every piece in ascending square order.
    pub fn pieces(&self) -> Vec<PieceInfo> {
        self.board
            .occupied()
            .map(|(index, pc)| PieceInfo {
                index,
                row: row_of(index),
                col: col_of(index),
                kind: pc.kind,
                color: pc.color,
                id: pc.id,
            })
            .collect()
    }

    pub fn state(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            current_player: self.current_player,
            history: self.history.clone(),
            check: self.check,
            winner: self.winner,
            last_move: self.last_move,
        }
    }

    /// Legal moves of the piece on `sq`, whichever side it belongs to.
    pub fn legal_moves(&mut self, sq: u8) -> Vec<Move> {
        legal_moves_from(&mut self.board, sq, self.en_passant)
    }

    /// All legal moves for the side to move.
    pub fn all_legal_moves(&mut self) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        legal_moves_into(&mut self.board, self.current_player, self.en_passant, &mut out);
        out
    }

    /// Move with automatic queen promotion.
    pub fn move_piece(&mut self, from: u8, to: u8) -> Result<MoveOutcome, MoveError> {
        self.move_with_promotion(from, to, None)
    }

    /// Validate and commit a move. `promotion` defaults to a queen and is
    /// ignored for moves that do not promote.
    pub fn move_with_promotion(
        &mut self,
        from: u8,
        to: u8,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        let owner = match self.board.piece_at(from) {
            Some(pc) => pc.color,
            None => return Err(MoveError::EmptySquare(from)),
        };
        if owner != self.current_player {
            return Err(MoveError::NotYourPiece {
                square: from,
                owner,
                to_move: self.current_player,
            });
        }

        let wanted = promotion.unwrap_or(PieceKind::Queen);
        let mv = self
            .legal_moves(from)
            .into_iter()
            .find(|m| m.to == to && m.promotion.is_none_or(|p| p == wanted))
            .ok_or(MoveError::IllegalMove { from, to })?;

        Ok(self.commit(mv))
    }

    fn commit(&mut self, mv: Move) -> MoveOutcome {
        let mover = self.current_player;
        let app = apply(&mut self.board, &mv);
        let kind = app.prev_kind();

        self.en_passant = en_passant_after(&app, mover);

        let capture = app.captured.is_some();
        self.halfmove_clock = if kind == PieceKind::Pawn || capture {
            0
        } else {
            self.halfmove_clock + 1
        };
        if mover == Color::Black {
            self.fullmove_number += 1;
        }

        let opponent = mover.other();
        let check = is_king_in_check(&self.board, opponent);
        let can_move = has_any_legal_move(&mut self.board, opponent, self.en_passant);
        let checkmate = check && !can_move;
        let stalemate = !check && !can_move;
        if checkmate {
            self.winner = Some(mover.into());
        } else if stalemate {
            self.winner = Some(Winner::Draw);
        }

        let notation = describe(&NotationInput {
            color: mover,
            kind,
            mv,
            capture,
            check,
            checkmate,
            stalemate,
        });
        debug!(%notation, "move committed");
        if let Some(w) = self.winner {
            info!(winner = ?w, "game over");
        }

        self.history.push(notation.clone());
        self.last_move = Some(LastMove {
            from: mv.from,
            to: mv.to,
            rook: app.rook.as_ref().map(|r| (r.from, r.to)),
        });
        self.check = check;
        self.current_player = opponent;

        MoveOutcome {
            mv,
            color: mover,
            piece: kind,
            piece_id: app.piece_id,
            captured: app.captured,
            captured_square: app.captured_square,
            check,
            checkmate,
            stalemate,
            castle: mv.castle,
            en_passant: mv.is_en_passant(),
            promotion: mv.promotion,
            winner: self.winner,
            notation,
        }
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
