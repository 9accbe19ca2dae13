//////////////////////////
// movegen.rs
//////////////////////////

use crate::board::Board;
use crate::types::*;

/// Geometry and occupancy rules only. Whether the mover's king ends up in
/// check is the legal-move filter's business.
pub fn is_pseudo_legal(piece: &Piece, target: Square, board: &Board) -> bool {
    if !Board::is_within_bounds(target) || target == piece.position {
        return false;
    }
    if let Some(dest) = board.get(target) {
        if dest.color == piece.color {
            return false;
        }
    }

    let dr = target.0 as isize - piece.position.0 as isize;
    let dc = target.1 as isize - piece.position.1 as isize;

    match piece.piece_type {
        PieceType::Pawn => is_valid_pawn_move(piece, target, dr, dc, board),
        PieceType::Knight => is_valid_knight_move(dr, dc),
        PieceType::Bishop => is_diagonal(dr, dc) && is_path_clear(piece.position, target, board),
        PieceType::Rook => is_straight(dr, dc) && is_path_clear(piece.position, target, board),
        PieceType::Queen => {
            (is_diagonal(dr, dc) || is_straight(dr, dc))
                && is_path_clear(piece.position, target, board)
        }
        PieceType::King => dr.abs() <= 1 && dc.abs() <= 1,
    }
}

fn is_valid_pawn_move(piece: &Piece, target: Square, dr: isize, dc: isize, board: &Board) -> bool {
    let direction = piece.color.pawn_direction();
    let target_empty = board.is_empty(target);

    if dc == 0 {
        // Single push
        if dr == direction && target_empty {
            return true;
        }
        // Double push from the start row, both squares empty
        if dr == 2 * direction && piece.position.0 == piece.color.pawn_start_row() && target_empty {
            let between = ((piece.position.0 as isize + direction) as usize, piece.position.1);
            return board.is_empty(between);
        }
        return false;
    }

    // Capture only, and only onto the other color (own color rejected above)
    dc.abs() == 1 && dr == direction && !target_empty
}

fn is_valid_knight_move(dr: isize, dc: isize) -> bool {
    matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2))
}

fn is_diagonal(dr: isize, dc: isize) -> bool {
    dr.abs() == dc.abs() && dr != 0
}

fn is_straight(dr: isize, dc: isize) -> bool {
    (dr == 0) != (dc == 0)
}

/// Every square strictly between `from` and `to` is empty. `false` when the
/// two squares do not share a rank, file or diagonal, or when a step leaves
/// the board.
pub fn is_path_clear(from: Square, to: Square, board: &Board) -> bool {
    let (fr, fc) = (from.0 as isize, from.1 as isize);
    let (tr, tc) = (to.0 as isize, to.1 as isize);

    if !(is_straight(tr - fr, tc - fc) || is_diagonal(tr - fr, tc - fc)) {
        return false;
    }

    let dr = (tr - fr).signum();
    let dc = (tc - fc).signum();

    let mut r = fr + dr;
    let mut c = fc + dc;

    while (r, c) != (tr, tc) {
        if r < 0 || r >= BOARD_SIZE as isize || c < 0 || c >= BOARD_SIZE as isize {
            return false;
        }
        if !board.is_empty((r as usize, c as usize)) {
            return false;
        }
        r += dr;
        c += dc;
    }
    true
}

/// All pseudo-legal targets for `piece`, row-major.
pub fn pseudo_legal_targets(piece: &Piece, board: &Board) -> Vec<Square> {
    (0..BOARD_SIZE)
        .flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
        .filter(|&sq| is_pseudo_legal(piece, sq, board))
        .collect()
}
