//! UCI text lines in both directions.

use chess_core::{UciMove, parse_uci_move};

use crate::error::EngineError;

/// A line of engine output, classified by its first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineLine<'a> {
    UciOk,
    ReadyOk,
    BestMove {
        mv: Option<&'a str>,
        ponder: Option<&'a str>,
    },
    /// `id`, `option`, `info` and anything unknown
    Other,
}

pub fn parse_line(line: &str) -> EngineLine<'_> {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("uciok") => EngineLine::UciOk,
        Some("readyok") => EngineLine::ReadyOk,
        Some("bestmove") => {
            let mv = tokens.next();
            let ponder = match tokens.next() {
                Some("ponder") => tokens.next(),
                _ => None,
            };
            EngineLine::BestMove { mv, ponder }
        }
        _ => EngineLine::Other,
    }
}

/// Decode the move token of a `bestmove` line. `(none)` and `0000` mean the
/// side to move has no legal move.
pub fn parse_best_move(line: &str) -> Result<Option<UciMove>, EngineError> {
    match parse_line(line) {
        EngineLine::BestMove { mv: Some("(none)" | "0000"), .. } => Ok(None),
        EngineLine::BestMove { mv: Some(mv), .. } => Ok(Some(parse_uci_move(mv)?)),
        _ => Err(EngineError::Protocol(line.to_string())),
    }
}

/// Which reply a pending registration is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    UciOk,
    ReadyOk,
    BestMove,
}

impl Expect {
    pub fn matches(self, line: &EngineLine<'_>) -> bool {
        matches!(
            (self, line),
            (Expect::UciOk, EngineLine::UciOk)
                | (Expect::ReadyOk, EngineLine::ReadyOk)
                | (Expect::BestMove, EngineLine::BestMove { .. })
        )
    }

    /// Command name used in timeout errors.
    pub fn command(self) -> &'static str {
        match self {
            Expect::UciOk => "uci",
            Expect::ReadyOk => "isready",
            Expect::BestMove => "go",
        }
    }
}

pub fn setoption(name: &str, value: impl std::fmt::Display) -> String {
    format!("setoption name {name} value {value}")
}

pub fn position_fen(fen: &str) -> String {
    format!("position fen {fen}")
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
