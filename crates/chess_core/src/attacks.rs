//! Square-attack queries used for check detection and castling safety.

use crate::{board::Board, types::*};

pub(crate) const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub(crate) const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub(crate) const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// True if any piece of colour `by` attacks `target`.
pub fn is_square_attacked(board: &Board, target: u8, by: Color) -> bool {
    let tr = row_of(target);
    let tc = col_of(target);

    // A pawn attacks the two squares diagonally in front of it, so look one
    // row behind the target from the attacker's point of view.
    let pawn_row = tr - by.forward();
    for dc in [-1, 1] {
        if let Some(s) = sq(pawn_row, tc + dc)
            && let Some(pc) = board.piece_at(s)
            && pc.is(by, PieceKind::Pawn)
        {
            return true;
        }
    }

    for (dr, dc) in KNIGHT_DELTAS {
        if let Some(s) = sq(tr + dr, tc + dc)
            && let Some(pc) = board.piece_at(s)
            && pc.is(by, PieceKind::Knight)
        {
            return true;
        }
    }

    for (dr, dc) in KING_DELTAS {
        if let Some(s) = sq(tr + dr, tc + dc)
            && let Some(pc) = board.piece_at(s)
            && pc.is(by, PieceKind::King)
        {
            return true;
        }
    }

    ray_hits(board, tr, tc, by, &DIAGONALS, PieceKind::Bishop)
        || ray_hits(board, tr, tc, by, &ORTHOGONALS, PieceKind::Rook)
}

/// Walk each ray from (tr, tc); the first piece met ends the ray and counts
/// if it is an enemy `slider` or queen.
fn ray_hits(
    board: &Board,
    tr: i8,
    tc: i8,
    by: Color,
    dirs: &[(i8, i8)],
    slider: PieceKind,
) -> bool {
    for (dr, dc) in dirs {
        let mut r = tr + dr;
        let mut c = tc + dc;
        while let Some(s) = sq(r, c) {
            if let Some(pc) = board.piece_at(s) {
                if pc.color == by && (pc.kind == slider || pc.kind == PieceKind::Queen) {
                    return true;
                }
                break;
            }
            r += dr;
            c += dc;
        }
    }
    false
}

/// True if `color`'s king is attacked. A board without that king is treated
/// as not in check so malformed positions stay playable.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    match board.king_sq(color) {
        Some(ksq) => is_square_attacked(board, ksq, color.other()),
        None => false,
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
