use crate::{
    attacks::{DIAGONALS, KING_DELTAS, KNIGHT_DELTAS, ORTHOGONALS, is_king_in_check, is_square_attacked},
    board::Board,
    makemove::{apply, undo},
    types::*,
};

/// Legal moves of the piece on `from`. The board is mutated while each
/// candidate is tried and restored before returning.
pub fn legal_moves_from(board: &mut Board, from: u8, ep: Option<EnPassantTarget>) -> Vec<Move> {
    let mut out = Vec::with_capacity(32);
    pseudo_moves_from(board, from, ep, &mut out);
    retain_legal(board, &mut out);
    out
}

/// Generate all legal moves for `color` into the provided buffer, reusing it
/// across calls.
pub fn legal_moves_into(
    board: &mut Board,
    color: Color,
    ep: Option<EnPassantTarget>,
    out: &mut Vec<Move>,
) {
    out.clear();
    for from in 0..64u8 {
        if board.piece_at(from).is_some_and(|pc| pc.color == color) {
            pseudo_moves_from(board, from, ep, out);
        }
    }
    retain_legal(board, out);
}

/// True as soon as one legal move for `color` is found.
pub fn has_any_legal_move(board: &mut Board, color: Color, ep: Option<EnPassantTarget>) -> bool {
    let mut buf = Vec::with_capacity(32);
    for from in 0..64u8 {
        if !board.piece_at(from).is_some_and(|pc| pc.color == color) {
            continue;
        }
        buf.clear();
        pseudo_moves_from(board, from, ep, &mut buf);
        retain_legal(board, &mut buf);
        if !buf.is_empty() {
            return true;
        }
    }
    false
}

// Filter illegal moves in-place by playing them on the mutable board.
fn retain_legal(board: &mut Board, out: &mut Vec<Move>) {
    out.retain(|mv| {
        let mover = match board.piece_at(mv.from) {
            Some(pc) => pc.color,
            None => return false,
        };
        let app = apply(board, mv);
        let illegal = is_king_in_check(board, mover);
        undo(board, app);
        !illegal
    });
}

/// Pseudo-legal moves of the piece on `from`: shape rules only, own king
/// safety is not considered (castling through attacked squares is already
/// excluded here).
pub fn pseudo_moves_from(board: &Board, from: u8, ep: Option<EnPassantTarget>, out: &mut Vec<Move>) {
    let pc = match board.piece_at(from) {
        Some(p) => p,
        None => return,
    };
    let c = pc.color;
    match pc.kind {
        PieceKind::Pawn => gen_pawn(board, from, c, ep, out),
        PieceKind::Knight => gen_steps(board, from, c, &KNIGHT_DELTAS, out),
        PieceKind::Bishop => gen_slider(board, from, c, &DIAGONALS, out),
        PieceKind::Rook => gen_slider(board, from, c, &ORTHOGONALS, out),
        PieceKind::Queen => {
            gen_slider(board, from, c, &DIAGONALS, out);
            gen_slider(board, from, c, &ORTHOGONALS, out);
        }
        PieceKind::King => {
            gen_steps(board, from, c, &KING_DELTAS, out);
            if !pc.has_moved {
                gen_castle(board, from, c, out);
            }
        }
    }
}

fn push_pawn_move(from: u8, to: u8, c: Color, out: &mut Vec<Move>) {
    if row_of(to) == c.promotion_row() {
        for pk in PieceKind::PROMOTIONS {
            out.push(Move::new(from, to).with_promotion(pk));
        }
    } else {
        out.push(Move::new(from, to));
    }
}

fn gen_pawn(board: &Board, from: u8, c: Color, ep: Option<EnPassantTarget>, out: &mut Vec<Move>) {
    let r = row_of(from);
    let f = col_of(from);
    let dir = c.forward();

    // forward 1
    if let Some(to) = sq(r + dir, f)
        && board.is_empty(to)
    {
        push_pawn_move(from, to, c, out);

        // forward 2 from start
        if r == c.pawn_start_row()
            && let Some(to2) = sq(r + 2 * dir, f)
            && board.is_empty(to2)
        {
            out.push(Move::new(from, to2));
        }
    }

    // captures + en-passant
    for df in [-1, 1] {
        let Some(to) = sq(r + dir, f + df) else {
            continue;
        };
        match board.piece_at(to) {
            Some(tpc) if tpc.color != c => push_pawn_move(from, to, c, out),
            Some(_) => {}
            None => {
                let Some(target) = ep else { continue };
                if target.square != to || target.capturer != c {
                    continue;
                }
                // The pawn that double-stepped sits beside us, behind the target.
                if let Some(victim_sq) = sq(r, f + df)
                    && board
                        .piece_at(victim_sq)
                        .is_some_and(|v| v.is(c.other(), PieceKind::Pawn))
                {
                    let mut mv = Move::new(from, to);
                    mv.en_passant_capture = Some(victim_sq);
                    out.push(mv);
                }
            }
        }
    }
}

fn gen_steps(board: &Board, from: u8, c: Color, deltas: &[(i8, i8)], out: &mut Vec<Move>) {
    let r = row_of(from);
    let f = col_of(from);
    for (dr, df) in deltas {
        if let Some(to) = sq(r + dr, f + df) {
            match board.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => out.push(Move::new(from, to)),
                _ => {}
            }
        }
    }
}

fn gen_slider(board: &Board, from: u8, c: Color, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    let r0 = row_of(from);
    let f0 = col_of(from);
    for (dr, df) in dirs {
        let mut r = r0 + dr;
        let mut f = f0 + df;
        while let Some(to) = sq(r, f) {
            match board.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => {
                    out.push(Move::new(from, to));
                    break;
                }
                _ => break,
            }
            r += dr;
            f += df;
        }
    }
}

fn gen_castle(board: &Board, from: u8, c: Color, out: &mut Vec<Move>) {
    // Must be on original king square
    let row = c.back_row();
    if Some(from) != sq(row, 4) {
        return;
    }

    // Can't castle out of check
    let enemy = c.other();
    if is_square_attacked(board, from, enemy) {
        return;
    }

    for (side, rook_col, dir) in [(CastleSide::King, 7i8, 1i8), (CastleSide::Queen, 0, -1)] {
        let Some(rook_from) = sq(row, rook_col) else {
            continue;
        };
        let rook_ready = board
            .piece_at(rook_from)
            .is_some_and(|rk| rk.is(c, PieceKind::Rook) && !rk.has_moved);
        if !rook_ready {
            continue;
        }

        // Every square strictly between king and rook must be empty
        let mut col = 4 + dir;
        let mut path_clear = true;
        while col != rook_col {
            if sq(row, col).is_none_or(|s| !board.is_empty(s)) {
                path_clear = false;
                break;
            }
            col += dir;
        }
        if !path_clear {
            continue;
        }

        // The king passes one square and lands on the next; neither may be attacked
        let transit = [sq(row, 4 + dir), sq(row, 4 + 2 * dir)];
        if transit
            .iter()
            .any(|s| s.is_none_or(|s| is_square_attacked(board, s, enemy)))
        {
            continue;
        }

        let (Some(to), Some(rook_to)) = (sq(row, 4 + 2 * dir), sq(row, 4 + dir)) else {
            continue;
        };
        let mut mv = Move::new(from, to);
        mv.castle = Some(CastleMove {
            side,
            rook_from,
            rook_to,
        });
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
