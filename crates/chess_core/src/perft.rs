use crate::{
    board::Board,
    game::ChessGame,
    makemove::{apply, en_passant_after, undo},
    movegen::legal_moves_into,
    types::{Color, EnPassantTarget, Move},
};

/// Pure perft node count.
/// Counts all legal positions from the game's current one down to `depth`,
/// working on a scratch copy of the board.
pub fn perft(game: &ChessGame, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(
        board: &mut Board,
        side: Color,
        ep: Option<EnPassantTarget>,
        depth: u8,
        layers: &mut [Vec<Move>],
    ) -> u64 {
        if depth == 0 {
            return 1;
        }

        let (buf, rest) = layers
            .split_first_mut()
            .expect("perft requires one buffer per remaining ply");

        legal_moves_into(board, side, ep, buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in buf.iter() {
            let app = apply(board, mv);
            let next_ep = en_passant_after(&app, side);
            nodes += inner(board, side.other(), next_ep, depth - 1, rest);
            undo(board, app);
        }
        nodes
    }

    let mut board = game.board().clone();
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(
        &mut board,
        game.current_player(),
        game.en_passant_target(),
        depth,
        &mut layers[..],
    )
}
