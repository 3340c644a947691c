//! Forsyth-Edwards Notation import and export for [`ChessGame`].

use crate::{
    attacks::is_king_in_check,
    board::Board,
    error::FenError,
    game::{ChessGame, Winner},
    movegen::has_any_legal_move,
    types::*,
};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Castling right letter -> (king square, rook square, colour)
const CASTLING: [(char, u8, u8, Color); 4] = [
    ('K', 60, 63, Color::White),
    ('Q', 60, 56, Color::White),
    ('k', 4, 7, Color::Black),
    ('q', 4, 0, Color::Black),
];

fn piece_char(pc: &Piece) -> char {
    let ch = pc.kind.letter();
    match pc.color {
        Color::White => ch,
        Color::Black => ch.to_ascii_lowercase(),
    }
}

impl ChessGame {
    /// Full six-field FEN of the current position.
    pub fn fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for row in 0..8i8 {
            let mut empty = 0;
            for col in 0..8i8 {
                let Some(s) = sq(row, col) else { continue };
                match self.board.piece_at(s) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece_char(pc));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if row < 7 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.current_player {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let rights: String = CASTLING
            .iter()
            .filter(|(_, king, rook, color)| {
                let unmoved = |s: u8, kind: PieceKind| {
                    self.board
                        .piece_at(s)
                        .is_some_and(|pc| pc.is(*color, kind) && !pc.has_moved)
                };
                unmoved(*king, PieceKind::King) && unmoved(*rook, PieceKind::Rook)
            })
            .map(|(ch, ..)| *ch)
            .collect();
        if rights.is_empty() {
            out.push('-');
        } else {
            out.push_str(&rights);
        }

        out.push(' ');
        match self.en_passant {
            Some(target) => out.push_str(&sq_to_coord(target.square)),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    /// Parse a FEN position. Halfmove and fullmove fields are optional.
    ///
    /// Piece ids are assigned in square order. Kings and rooks count as
    /// unmoved only where the castling field grants a right that uses them;
    /// pawns are unmoved on their starting row; other pieces are unmoved on
    /// their standard home square.
    pub fn from_fen(fen: &str) -> Result<ChessGame, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut board = Board::empty();
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col: usize = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if !(1..=8).contains(&d) {
                        return Err(FenError::InvalidPiece(ch));
                    }
                    col += d as usize;
                } else {
                    let kind = PieceKind::from_letter(ch).ok_or(FenError::InvalidPiece(ch))?;
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if col >= 8 {
                        return Err(FenError::RankWidth {
                            rank: 8 - row,
                            files: col + 1,
                        });
                    }
                    board.spawn((row * 8 + col) as u8, kind, color);
                    col += 1;
                }
            }
            if col != 8 {
                return Err(FenError::RankWidth {
                    rank: 8 - row,
                    files: col,
                });
            }
        }

        let current_player = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        };

        let castling = parts[2];
        if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
            return Err(FenError::InvalidCastling(castling.to_string()));
        }
        mark_moved(&mut board, castling);

        let en_passant = match parts[3] {
            "-" => None,
            coord => {
                let square = coord_to_sq(coord)
                    .filter(|&sq| en_passant_plausible(&board, sq, current_player))
                    .ok_or_else(|| FenError::InvalidEnPassant(coord.to_string()))?;
                Some(EnPassantTarget {
                    square,
                    capturer: current_player,
                })
            }
        };

        let counter = |idx: usize, default: u32| -> Result<u32, FenError> {
            match parts.get(idx) {
                None => Ok(default),
                Some(s) => s.parse().map_err(|_| FenError::InvalidCounter(s.to_string())),
            }
        };
        let halfmove_clock = counter(4, 0)?;
        let fullmove_number = counter(5, 1)?;

        let mut game = ChessGame::with_board(board, current_player);
        game.en_passant = en_passant;
        game.halfmove_clock = halfmove_clock;
        game.fullmove_number = fullmove_number;
        game.check = is_king_in_check(&game.board, current_player);
        if !has_any_legal_move(&mut game.board, current_player, en_passant) {
            game.winner = Some(if game.check {
                Winner::from(current_player.other())
            } else {
                Winner::Draw
            });
        }
        Ok(game)
    }
}

/// The target must lie on the square the victim's double push skipped,
/// be empty, and have the victim pawn right in front of it.
fn en_passant_plausible(board: &Board, target: u8, capturer: Color) -> bool {
    let victim = capturer.other();
    let row = row_of(target);
    if row != victim.pawn_start_row() + victim.forward() || board.piece_at(target).is_some() {
        return false;
    }
    sq(row + victim.forward(), col_of(target)).is_some_and(|s| {
        board
            .piece_at(s)
            .is_some_and(|p| p.kind == PieceKind::Pawn && p.color == victim)
    })
}

fn mark_moved(board: &mut Board, castling: &str) {
    let home = Board::startpos();
    for s in 0..64u8 {
        let Some(pc) = board.piece_at(s) else { continue };
        let unmoved = match pc.kind {
            PieceKind::Pawn => row_of(s) == pc.color.pawn_start_row(),
            PieceKind::King => CASTLING
                .iter()
                .any(|(ch, king, _, color)| castling.contains(*ch) && *king == s && *color == pc.color),
            PieceKind::Rook => CASTLING
                .iter()
                .any(|(ch, _, rook, color)| castling.contains(*ch) && *rook == s && *color == pc.color),
            _ => home
                .piece_at(s)
                .is_some_and(|h| h.is(pc.color, pc.kind)),
        };
        if let Some(pc) = board.piece_at_mut(s) {
            pc.has_moved = !unmoved;
        }
    }
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
