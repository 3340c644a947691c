//! What the renderer is asked to draw, and the trait it implements.

use chess_core::{ChessGame, Color, PieceKind, col_of, row_of, sq};
use serde::Serialize;

use crate::geometry::Vec3;
use crate::selection::Selection;

/// Centre of `square` on the board plane.
pub fn square_center(square: u8) -> Vec3 {
    Vec3::new(
        col_of(square) as f32 - 3.5,
        0.0,
        row_of(square) as f32 - 3.5,
    )
}

/// Square containing the board-plane point `(x, z)`, if any.
pub fn square_at(x: f32, z: f32) -> Option<u8> {
    let col = (x + 4.0).floor();
    let row = (z + 4.0).floor();
    if !(0.0..8.0).contains(&col) || !(0.0..8.0).contains(&row) {
        return None;
    }
    sq(row as i8, col as i8)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquareInstance {
    pub square: u8,
    pub light: bool,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieceInstance {
    pub id: u32,
    pub kind: PieceKind,
    pub color: Color,
    pub square: u8,
    pub position: Vec3,
}

impl PieceInstance {
    pub fn new(id: u32, kind: PieceKind, color: Color, square: u8) -> Self {
        Self {
            id,
            kind,
            color,
            square,
            position: square_center(square),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Selected,
    QuietTarget,
    CaptureTarget,
    LastMove,
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub square: u8,
    pub kind: HighlightKind,
}

/// Everything drawn in one frame. Piece positions are the logical
/// squares; animation offsets are applied on top through [`Renderer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    pub squares: Vec<SquareInstance>,
    pub highlights: Vec<Highlight>,
    pub pieces: Vec<PieceInstance>,
}

impl SceneFrame {
    /// Build the frame for the committed game state. `departing` are
    /// captured pieces still playing their capture animation.
    pub fn build(game: &ChessGame, selection: &Selection, departing: &[PieceInstance]) -> Self {
        let squares = (0..64u8)
            .map(|s| SquareInstance {
                square: s,
                light: (row_of(s) + col_of(s)) % 2 == 0,
                position: square_center(s),
            })
            .collect();

        let mut highlights = Vec::new();
        let state = game.state();
        if let Some(last) = state.last_move {
            for s in [last.from, last.to] {
                highlights.push(Highlight {
                    square: s,
                    kind: HighlightKind::LastMove,
                });
            }
            if let Some((from, to)) = last.rook {
                for s in [from, to] {
                    highlights.push(Highlight {
                        square: s,
                        kind: HighlightKind::LastMove,
                    });
                }
            }
        }
        if let Selection::Selected { square, moves } = selection {
            highlights.push(Highlight {
                square: *square,
                kind: HighlightKind::Selected,
            });
            for mv in moves {
                let capture = game.piece_at(mv.to).is_some() || mv.is_en_passant();
                highlights.push(Highlight {
                    square: mv.to,
                    kind: if capture {
                        HighlightKind::CaptureTarget
                    } else {
                        HighlightKind::QuietTarget
                    },
                });
            }
            // Promotion candidates share a target square
            highlights.dedup();
        }
        if state.check
            && let Some(king) = game.board().king_sq(state.current_player)
        {
            highlights.push(Highlight {
                square: king,
                kind: HighlightKind::Check,
            });
        }

        let mut pieces: Vec<PieceInstance> = game
            .pieces()
            .into_iter()
            .map(|p| PieceInstance::new(p.id, p.kind, p.color, p.index))
            .collect();
        pieces.extend(departing.iter().cloned());

        Self {
            squares,
            highlights,
            pieces,
        }
    }
}

/// The 3D renderer as seen from the orchestrator. Pieces are addressed by
/// their stable id.
pub trait Renderer {
    /// Replace the drawn board, highlights and piece instances.
    fn present(&mut self, frame: &SceneFrame);
    fn set_piece_position(&mut self, id: u32, position: Vec3);
    /// Visual displacement added to the piece's position.
    fn set_piece_offset(&mut self, id: u32, offset: Vec3);
    fn set_piece_scale(&mut self, id: u32, scale: f32);
    /// Tilt in radians added to the piece's resting orientation.
    fn set_piece_rotation_offset(&mut self, id: u32, angle: f32);
    fn remove_piece(&mut self, id: u32);
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod scene_tests;
