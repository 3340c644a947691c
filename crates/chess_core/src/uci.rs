//! Long algebraic move strings as used by the UCI protocol (`e2e4`, `e7e8q`).

use std::fmt;
use std::str::FromStr;

use crate::{error::UciMoveError, types::*};

/// A move as the engine spells it: squares plus an optional promotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UciMove {
    pub from: u8,
    pub to: u8,
    pub promotion: Option<PieceKind>,
}

impl From<&Move> for UciMove {
    fn from(mv: &Move) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", sq_to_coord(self.from), sq_to_coord(self.to))?;
        if let Some(p) = self.promotion {
            write!(f, "{}", p.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for UciMove {
    type Err = UciMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uci_move(s)
    }
}

pub fn move_to_uci(mv: &Move) -> String {
    UciMove::from(mv).to_string()
}

pub fn parse_uci_move(txt: &str) -> Result<UciMove, UciMoveError> {
    let chars: Vec<char> = txt.chars().collect();
    if chars.len() != 4 && chars.len() != 5 {
        return Err(UciMoveError::Length(txt.to_string()));
    }

    let square = |file: char, rank: char| -> Result<u8, UciMoveError> {
        if !('a'..='h').contains(&file) {
            return Err(UciMoveError::File(txt.to_string(), file));
        }
        let rank_num = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or_else(|| UciMoveError::Rank(txt.to_string(), rank))?;
        let col = file as u8 - b'a';
        let row = 8 - rank_num as u8;
        Ok(row * 8 + col)
    };

    let from = square(chars[0], chars[1])?;
    let to = square(chars[2], chars[3])?;
    let promotion = match chars.get(4) {
        None => None,
        Some(&ch) => Some(match ch.to_ascii_lowercase() {
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            _ => return Err(UciMoveError::Promotion(txt.to_string(), ch)),
        }),
    };

    Ok(UciMove {
        from,
        to,
        promotion,
    })
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
