//! Click-driven piece selection.

use chess_core::{ChessGame, Move};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected { square: u8, moves: Vec<Move> },
}

/// What a click asks the orchestrator to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Selected(u8),
    Cleared,
    Attempt { from: u8, to: u8 },
}

impl Selection {
    pub fn square(&self) -> Option<u8> {
        match self {
            Selection::Idle => None,
            Selection::Selected { square, .. } => Some(*square),
        }
    }

    pub fn moves(&self) -> &[Move] {
        match self {
            Selection::Idle => &[],
            Selection::Selected { moves, .. } => moves,
        }
    }

    /// Distinct target squares of the selected piece. A promotion lists
    /// one move per piece kind but only one square.
    pub fn targets(&self) -> Vec<u8> {
        let mut targets: Vec<u8> = Vec::new();
        for m in self.moves() {
            if !targets.contains(&m.to) {
                targets.push(m.to);
            }
        }
        targets
    }

    /// Advance on a click on `square`.
    ///
    /// A listed target becomes a move attempt. Otherwise an own piece with
    /// legal moves is (re)selected and anything else clears the selection.
    pub fn click(&mut self, game: &mut ChessGame, square: u8) -> ClickAction {
        if let Selection::Selected { square: from, moves } = self
            && moves.iter().any(|m| m.to == square)
        {
            let from = *from;
            *self = Selection::Idle;
            return ClickAction::Attempt { from, to: square };
        }

        let to_move = game.current_player();
        let own = game.piece_at(square).is_some_and(|p| p.color == to_move);
        if own {
            let moves = game.legal_moves(square);
            if !moves.is_empty() {
                *self = Selection::Selected { square, moves };
                return ClickAction::Selected(square);
            }
        }

        *self = Selection::Idle;
        ClickAction::Cleared
    }

    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod selection_tests;
