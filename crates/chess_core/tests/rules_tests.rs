use rand::{Rng, SeedableRng, rngs::StdRng};

use chess_core::{ChessGame, Color, Winner, apply, coord_to_sq, is_king_in_check, undo};

fn s(c: &str) -> u8 {
    coord_to_sq(c).unwrap()
}

#[test]
fn random_playouts_never_leave_king_in_check() {
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = ChessGame::new();

        for _ in 0..120 {
            if game.winner().is_some() {
                break;
            }
            let mover = game.current_player();
            let moves = game.all_legal_moves();
            assert!(!moves.is_empty(), "no moves but no winner (seed {seed})");

            for mv in &moves {
                let mut board = game.board().clone();
                let app = apply(&mut board, mv);
                assert!(
                    !is_king_in_check(&board, mover),
                    "{mv:?} leaves {mover} in check (seed {seed})"
                );
                undo(&mut board, app);
                assert_eq!(&board, game.board());
            }

            let mv = moves[rng.gen_range(0..moves.len())];
            let outcome = game
                .move_with_promotion(mv.from, mv.to, mv.promotion)
                .unwrap();
            assert_eq!(outcome.color, mover);
            assert_eq!(game.current_player(), mover.other());
            assert_eq!(game.is_check(), is_king_in_check(game.board(), mover.other()));

            // FEN export and import agree on the position
            let reloaded = ChessGame::from_fen(&game.fen()).unwrap();
            assert_eq!(reloaded.fen(), game.fen());
        }
    }
}

#[test]
fn piece_ids_survive_a_game() {
    let mut game = ChessGame::new();
    let knight = game.piece_at(s("g1")).unwrap().id;
    for (from, to) in [("g1", "f3"), ("b8", "c6"), ("f3", "e5"), ("c6", "e5")] {
        game.move_piece(s(from), s(to)).unwrap();
    }
    // White's knight was captured on e5 by the c6 knight
    assert!(game.board().find_by_id(knight).is_none());
    assert_eq!(game.board().find_by_id(1), Some(s("e5")));
    assert_eq!(game.pieces().len(), 31);
}

#[test]
fn checkmate_ends_the_game() {
    let mut game = ChessGame::new();
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        game.move_piece(s(from), s(to)).unwrap();
    }
    assert_eq!(game.winner(), Some(Winner::Black));
    assert_eq!(game.current_player(), Color::White);
    assert!(game.all_legal_moves().is_empty());
}
