use crate::types::*;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 64 slots of optional pieces plus the id counter used when pieces are
/// created. The board has no rules knowledge of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    next_id: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: std::array::from_fn(|_| None),
            next_id: 0,
        }
    }

    /// Standard starting position. Ids are handed out in square order, so
    /// Black's a8 rook is id 0 and White's h1 rook is id 31.
    pub fn startpos() -> Self {
        let mut b = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            b.spawn(col as u8, kind, Color::Black);
        }
        for col in 0..8u8 {
            b.spawn(8 + col, PieceKind::Pawn, Color::Black);
        }
        for col in 0..8u8 {
            b.spawn(48 + col, PieceKind::Pawn, Color::White);
        }
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            b.spawn(56 + col as u8, kind, Color::White);
        }
        b
    }

    /// Create a fresh piece with the next id on `sq`, replacing anything there.
    pub fn spawn(&mut self, sq: u8, kind: PieceKind, color: Color) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.squares[sq as usize] = Some(Piece::new(kind, color, id));
        id
    }

    pub fn piece_at(&self, sq: u8) -> Option<&Piece> {
        self.squares[sq as usize].as_ref()
    }

    pub fn piece_at_mut(&mut self, sq: u8) -> Option<&mut Piece> {
        self.squares[sq as usize].as_mut()
    }

    pub fn is_empty(&self, sq: u8) -> bool {
        self.squares[sq as usize].is_none()
    }

    /// Remove and return the piece on `sq`.
    pub fn take(&mut self, sq: u8) -> Option<Piece> {
        self.squares[sq as usize].take()
    }

    /// Place `piece` on `sq`, returning whatever was there.
    pub fn put(&mut self, sq: u8, piece: Piece) -> Option<Piece> {
        self.squares[sq as usize].replace(piece)
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.occupied()
            .find(|(_, pc)| pc.is(c, PieceKind::King))
            .map(|(sq, _)| sq)
    }

    /// Occupied squares in ascending square order.
    pub fn occupied(&self) -> impl Iterator<Item = (u8, &Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|pc| (i as u8, pc)))
    }

    pub fn find_by_id(&self, id: u32) -> Option<u8> {
        self.occupied().find(|(_, pc)| pc.id == id).map(|(sq, _)| sq)
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
