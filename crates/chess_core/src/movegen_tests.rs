use super::*;
use crate::game::ChessGame;

fn s(c: &str) -> u8 {
    coord_to_sq(c).unwrap()
}

fn targets(moves: &[Move]) -> Vec<String> {
    let mut t: Vec<String> = moves.iter().map(|m| sq_to_coord(m.to)).collect();
    t.sort();
    t
}

#[test]
fn test_startpos_moves() {
    let mut board = Board::startpos();
    let mut moves = Vec::new();
    legal_moves_into(&mut board, Color::White, None, &mut moves);
    // Starting position has 20 legal moves
    assert_eq!(moves.len(), 20);
    assert_eq!(board, Board::startpos());
}

#[test]
fn test_kiwipete_moves() {
    // Kiwipete position - complex with many move types
    let mut game =
        ChessGame::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -")
            .unwrap();
    assert_eq!(game.all_legal_moves().len(), 48);
}

#[test]
fn test_pawn_pushes_from_start() {
    let mut board = Board::startpos();
    let moves = legal_moves_from(&mut board, s("e2"), None);
    assert_eq!(targets(&moves), vec!["e3", "e4"]);
}

#[test]
fn test_pawn_double_push_blocked() {
    let mut board = Board::startpos();
    board.spawn(s("e3"), PieceKind::Knight, Color::Black);
    let moves = legal_moves_from(&mut board, s("e2"), None);
    assert!(moves.is_empty());
}

#[test]
fn test_promotion_candidates() {
    let mut board = Board::empty();
    board.spawn(s("e1"), PieceKind::King, Color::White);
    board.spawn(s("a8"), PieceKind::King, Color::Black);
    board.spawn(s("g7"), PieceKind::Pawn, Color::White);
    board.spawn(s("h8"), PieceKind::Rook, Color::Black);

    let moves = legal_moves_from(&mut board, s("g7"), None);
    // 4 pushes to g8 and 4 captures on h8
    assert_eq!(moves.len(), 8);
    assert!(moves.iter().all(|m| m.promotion.is_some()));
    assert_eq!(moves[0].promotion, Some(PieceKind::Queen));
}

#[test]
fn test_en_passant_requires_matching_target() {
    let mut board = Board::empty();
    board.spawn(s("e1"), PieceKind::King, Color::White);
    board.spawn(s("e8"), PieceKind::King, Color::Black);
    board.spawn(s("e5"), PieceKind::Pawn, Color::White);
    board.spawn(s("d5"), PieceKind::Pawn, Color::Black);

    let none = legal_moves_from(&mut board, s("e5"), None);
    assert!(none.iter().all(|m| !m.is_en_passant()));

    let wrong_side = EnPassantTarget {
        square: s("d6"),
        capturer: Color::Black,
    };
    let moves = legal_moves_from(&mut board, s("e5"), Some(wrong_side));
    assert!(moves.iter().all(|m| !m.is_en_passant()));

    let target = EnPassantTarget {
        square: s("d6"),
        capturer: Color::White,
    };
    let moves = legal_moves_from(&mut board, s("e5"), Some(target));
    let ep: Vec<&Move> = moves.iter().filter(|m| m.is_en_passant()).collect();
    assert_eq!(ep.len(), 1);
    assert_eq!(ep[0].to, s("d6"));
    assert_eq!(ep[0].en_passant_capture, Some(s("d5")));
}

#[test]
fn test_pinned_piece_cannot_leave_line() {
    let mut board = Board::empty();
    board.spawn(s("e1"), PieceKind::King, Color::White);
    board.spawn(s("e2"), PieceKind::Knight, Color::White);
    board.spawn(s("e8"), PieceKind::Rook, Color::Black);
    board.spawn(s("a8"), PieceKind::King, Color::Black);

    assert!(legal_moves_from(&mut board, s("e2"), None).is_empty());
}

#[test]
fn test_slider_stops_at_blockers() {
    let mut board = Board::empty();
    board.spawn(s("a1"), PieceKind::Rook, Color::White);
    board.spawn(s("a3"), PieceKind::Pawn, Color::White);
    board.spawn(s("c1"), PieceKind::Pawn, Color::Black);
    board.spawn(s("h8"), PieceKind::King, Color::White);
    board.spawn(s("h6"), PieceKind::King, Color::Black);

    let moves = legal_moves_from(&mut board, s("a1"), None);
    assert_eq!(targets(&moves), vec!["a2", "b1", "c1"]);
}

#[test]
fn test_castling_both_sides_available() {
    let mut game = ChessGame::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let moves = game.legal_moves(s("e1"));
    let castles: Vec<&Move> = moves.iter().filter(|m| m.castle.is_some()).collect();
    assert_eq!(castles.len(), 2);

    let king_side = castles
        .iter()
        .find(|m| m.castle.unwrap().side == CastleSide::King)
        .unwrap();
    assert_eq!(king_side.to, s("g1"));
    assert_eq!(king_side.castle.unwrap().rook_from, s("h1"));
    assert_eq!(king_side.castle.unwrap().rook_to, s("f1"));

    let queen_side = castles
        .iter()
        .find(|m| m.castle.unwrap().side == CastleSide::Queen)
        .unwrap();
    assert_eq!(queen_side.to, s("c1"));
    assert_eq!(queen_side.castle.unwrap().rook_to, s("d1"));
}

#[test]
fn test_castling_blocked_by_attacked_transit() {
    // Black rook on f8 covers f1
    let mut game = ChessGame::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let moves = game.legal_moves(s("e1"));
    let sides: Vec<CastleSide> = moves.iter().filter_map(|m| m.castle.map(|c| c.side)).collect();
    assert_eq!(sides, vec![CastleSide::Queen]);
}

#[test]
fn test_queen_side_b_file_may_be_attacked_but_not_occupied() {
    // b1 attacked by the rook on b8: still fine
    let mut game = ChessGame::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
    assert!(game.legal_moves(s("e1")).iter().any(|m| m.castle.is_some()));

    let mut blocked = ChessGame::from_fen("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1").unwrap();
    assert!(blocked.legal_moves(s("e1")).iter().all(|m| m.castle.is_none()));
}

#[test]
fn test_no_castling_out_of_check() {
    let mut game = ChessGame::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    assert!(game.legal_moves(s("e1")).iter().all(|m| m.castle.is_none()));
}

#[test]
fn test_has_any_legal_move_matches_enumeration() {
    let mut stalemate = ChessGame::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(stalemate.all_legal_moves().is_empty());

    let mut board = Board::startpos();
    assert!(has_any_legal_move(&mut board, Color::Black, None));
}
