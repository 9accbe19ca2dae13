//////////////////////////
// check.rs
//////////////////////////

use crate::board::Board;
use crate::movegen::is_pseudo_legal;
use crate::types::*;

/// True iff some piece of `by_color` has a pseudo-legal move onto `pos`.
///
/// Pawns count only when their capture rule applies, so an empty or
/// same-colored square diagonal to a pawn is not reported as attacked.
pub fn is_square_attacked(pos: Square, by_color: Color, board: &Board) -> bool {
    board
        .pieces_of(by_color)
        .any(|piece| is_pseudo_legal(piece, pos, board))
}

/// A side with no king on the board is never in check.
pub fn is_king_in_check(color: Color, board: &Board) -> bool {
    match board.find_king(color) {
        Some(king_pos) => is_square_attacked(king_pos, color.opposite(), board),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nobody_is_in_check_at_the_start() {
        let board = Board::initial();
        assert!(!is_king_in_check(Color::White, &board));
        assert!(!is_king_in_check(Color::Black, &board));
    }

    #[test]
    fn rook_on_open_file_gives_check() {
        let board = Board::empty()
            .with_piece(PieceType::King, Color::White, (9, 5))
            .with_piece(PieceType::Rook, Color::Black, (0, 5));
        assert!(is_king_in_check(Color::White, &board));

        let blocked = board.with_piece(PieceType::Pawn, Color::Black, (4, 5));
        assert!(!is_king_in_check(Color::White, &blocked));
    }

    #[test]
    fn pawn_attacks_only_occupied_enemy_diagonals() {
        let board = Board::empty()
            .with_piece(PieceType::Pawn, Color::Black, (3, 3))
            .with_piece(PieceType::King, Color::White, (4, 4));
        assert!(is_king_in_check(Color::White, &board));
        // empty diagonal is not reported as attacked
        assert!(!is_square_attacked((4, 2), Color::Black, &board));
    }

    #[test]
    fn missing_king_means_no_check() {
        let board = Board::empty().with_piece(PieceType::Queen, Color::Black, (0, 0));
        assert!(!is_king_in_check(Color::White, &board));
    }
}
