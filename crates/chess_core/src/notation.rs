//! Human-readable move-history strings, e.g. `White: Pe2 → e4` or
//! `Black: Qh4 x e1 #`.

use crate::types::*;

/// Everything a history entry needs to know about a committed move.
pub struct NotationInput {
    pub color: Color,
    pub kind: PieceKind,
    pub mv: Move,
    pub capture: bool,
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
}

pub fn describe(input: &NotationInput) -> String {
    let suffix = if input.checkmate {
        " #"
    } else if input.stalemate {
        " ="
    } else if input.check {
        " +"
    } else {
        ""
    };

    if let Some(castle) = input.mv.castle {
        let label = match castle.side {
            CastleSide::King => "O-O",
            CastleSide::Queen => "O-O-O",
        };
        return format!("{}: {}{}", input.color, label, suffix);
    }

    let sep = if input.capture { "x" } else { "→" };
    let promotion = input
        .mv
        .promotion
        .map(|p| format!("={}", p.letter()))
        .unwrap_or_default();
    let en_passant = if input.mv.is_en_passant() { " (e.p.)" } else { "" };

    format!(
        "{}: {}{} {} {}{}{}{}",
        input.color,
        input.kind.letter(),
        sq_to_coord(input.mv.from),
        sep,
        sq_to_coord(input.mv.to),
        promotion,
        en_passant,
        suffix
    )
}
