//! Make/unmake of a single move on a [`Board`].
//!
//! [`apply`] records every field it touches in a [`MoveApplication`], and
//! [`undo`] restores exactly those fields. The legality filter relies on the
//! pair leaving the board bit-identical.

use crate::{board::Board, types::*};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RookShift {
    pub from: u8,
    pub to: u8,
    prev_has_moved: bool,
}

/// Undo token for one applied move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveApplication {
    pub mv: Move,
    pub piece_id: u32,
    prev_has_moved: bool,
    prev_kind: PieceKind,
    pub captured: Option<Piece>,
    /// Where the captured piece stood; differs from `mv.to` for en passant.
    pub captured_square: Option<u8>,
    pub rook: Option<RookShift>,
}

impl MoveApplication {
    /// Kind of the moving piece before the move (a pawn for promotions).
    pub fn prev_kind(&self) -> PieceKind {
        self.prev_kind
    }
}

/// En passant eligibility created by an applied move: only a two-square
/// pawn advance opens a target, on the square it passed over.
pub fn en_passant_after(app: &MoveApplication, mover: Color) -> Option<EnPassantTarget> {
    let mv = &app.mv;
    if app.prev_kind != PieceKind::Pawn
        || mv.is_en_passant()
        || (row_of(mv.to) - row_of(mv.from)).abs() != 2
    {
        return None;
    }
    sq((row_of(mv.from) + row_of(mv.to)) / 2, col_of(mv.from)).map(|square| EnPassantTarget {
        square,
        capturer: mover.other(),
    })
}

pub fn apply(board: &mut Board, mv: &Move) -> MoveApplication {
    let mut moved = board.take(mv.from).expect("no piece on from-square");

    let (captured, captured_square) = match mv.en_passant_capture {
        Some(cs) => {
            let cap = board.take(cs);
            let at = cap.as_ref().map(|_| cs);
            (cap, at)
        }
        None => {
            let cap = board.take(mv.to);
            let at = cap.as_ref().map(|_| mv.to);
            (cap, at)
        }
    };

    let prev_has_moved = moved.has_moved;
    let prev_kind = moved.kind;
    moved.has_moved = true;
    if let Some(promo) = mv.promotion {
        moved.kind = promo;
    }
    let piece_id = moved.id;
    board.put(mv.to, moved);

    let rook = mv.castle.map(|castle| {
        let mut rook = board
            .take(castle.rook_from)
            .expect("castling candidate without its rook");
        let prev_has_moved = rook.has_moved;
        rook.has_moved = true;
        board.put(castle.rook_to, rook);
        RookShift {
            from: castle.rook_from,
            to: castle.rook_to,
            prev_has_moved,
        }
    });

    MoveApplication {
        mv: *mv,
        piece_id,
        prev_has_moved,
        prev_kind,
        captured,
        captured_square,
        rook,
    }
}

pub fn undo(board: &mut Board, app: MoveApplication) {
    if let Some(shift) = app.rook
        && let Some(mut rook) = board.take(shift.to)
    {
        rook.has_moved = shift.prev_has_moved;
        board.put(shift.from, rook);
    }

    if let Some(mut piece) = board.take(app.mv.to) {
        piece.has_moved = app.prev_has_moved;
        piece.kind = app.prev_kind;
        board.put(app.mv.from, piece);
    }

    if let (Some(piece), Some(at)) = (app.captured, app.captured_square) {
        board.put(at, piece);
    }
}

#[cfg(test)]
#[path = "makemove_tests.rs"]
mod makemove_tests;
