//! Property: no move returned by the legal-move filter leaves the mover's own
//! king attacked.

use proptest::prelude::*;

use peer_chess::check::is_king_in_check;
use peer_chess::game::GameState;
use peer_chess::legal::{all_legal_moves, legal_moves};

/// Walks a game from the opening, picking each move by the next choice value.
/// Every position visited along the way is returned.
fn reachable_positions(choices: &[u16]) -> Vec<GameState> {
    let mut state = GameState::new();
    let mut seen = vec![state.clone()];
    for &choice in choices {
        if state.is_over() {
            break;
        }
        let moves = all_legal_moves(state.turn, &state.board);
        let (from, to) = moves[choice as usize % moves.len()];
        state = state.try_move(from, to).expect("generated move must be legal");
        seen.push(state.clone());
    }
    seen
}

proptest! {
    // 32 walks of 10..50 plies visit roughly a thousand positions.
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn legal_moves_never_expose_own_king(choices in prop::collection::vec(any::<u16>(), 10..50)) {
        for state in reachable_positions(&choices) {
            for piece in state.board.pieces_of(state.turn) {
                for target in legal_moves(piece, &state.board) {
                    let after = state.board.with_move(piece.position, target);
                    prop_assert!(
                        !is_king_in_check(piece.color, &after),
                        "{:?} {:?} -> {:?} leaves its king in check",
                        piece.piece_type,
                        piece.position,
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn each_side_keeps_exactly_one_king(choices in prop::collection::vec(any::<u16>(), 0..40)) {
        for state in reachable_positions(&choices) {
            prop_assert!(state.validate_board_state().is_ok());
        }
    }
}
