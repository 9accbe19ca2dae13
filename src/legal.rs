//////////////////////////
// legal.rs
//////////////////////////

use crate::board::Board;
use crate::check::is_king_in_check;
use crate::movegen::pseudo_legal_targets;
use crate::types::*;

/// Pseudo-legal targets that do not leave `piece`'s own king in check, in
/// row-major order.
///
/// Each candidate replays the move on a fresh board and rescans every
/// attacker, so the cost grows with the square of the board area.
pub fn legal_moves(piece: &Piece, board: &Board) -> Vec<Square> {
    pseudo_legal_targets(piece, board)
        .into_iter()
        .filter(|&target| {
            let after = board.with_move(piece.position, target);
            !is_king_in_check(piece.color, &after)
        })
        .collect()
}

/// Stops at the first piece that can move.
pub fn has_any_legal_move(color: Color, board: &Board) -> bool {
    board
        .pieces_of(color)
        .any(|piece| !legal_moves(piece, board).is_empty())
}

/// Every legal `(from, to)` pair for `color`.
pub fn all_legal_moves(color: Color, board: &Board) -> Vec<(Square, Square)> {
    board
        .pieces_of(color)
        .flat_map(|piece| {
            legal_moves(piece, board)
                .into_iter()
                .map(move |to| (piece.position, to))
        })
        .collect()
}
