use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use peer_chess::board::Board;
use peer_chess::check::is_king_in_check;
use peer_chess::game::GameState;
use peer_chess::legal::{all_legal_moves, has_any_legal_move};
use peer_chess::types::{Color, GameResult, PieceType};

fn position(board: Board, turn: Color) -> GameState {
    GameState {
        board,
        turn,
        history: Vec::new(),
        result: None,
        in_check: false,
    }
}

#[test]
fn protected_queen_delivers_mate() {
    let state = position(
        Board::empty()
            .with_piece(PieceType::King, Color::Black, (0, 0))
            .with_piece(PieceType::King, Color::White, (2, 2))
            .with_piece(PieceType::Queen, Color::White, (1, 7)),
        Color::White,
    );
    let next = state.try_move((1, 7), (1, 1)).unwrap();

    assert_eq!(next.result, Some(GameResult::Checkmate(Color::White)));
    assert!(next.is_over());
    assert!(next.in_check);
    assert_eq!(next.winner(), Some(Color::White));
    assert_eq!(next.history, vec!["Qh9->b9+"]);
    assert!(is_king_in_check(Color::Black, &next.board));
    assert!(!has_any_legal_move(Color::Black, &next.board));

    assert_eq!(next.try_move((0, 0), (0, 1)), Err(peer_chess::error::MoveError::GameOver));
}

#[test]
fn cornered_king_without_moves_is_stalemate() {
    let state = position(
        Board::empty()
            .with_piece(PieceType::King, Color::Black, (0, 0))
            .with_piece(PieceType::King, Color::White, (9, 9))
            .with_piece(PieceType::Queen, Color::White, (5, 2)),
        Color::White,
    );
    let next = state.try_move((5, 2), (1, 2)).unwrap();

    assert_eq!(next.result, Some(GameResult::Stalemate));
    assert!(!next.in_check);
    assert_eq!(next.winner(), None);
    assert!(!is_king_in_check(Color::Black, &next.board));
    assert!(!has_any_legal_move(Color::Black, &next.board));
}

#[test]
fn check_with_an_escape_is_not_terminal() {
    let state = position(
        Board::empty()
            .with_piece(PieceType::King, Color::Black, (0, 5))
            .with_piece(PieceType::King, Color::White, (9, 5))
            .with_piece(PieceType::Rook, Color::White, (9, 0)),
        Color::White,
    );
    let next = state.try_move((9, 0), (0, 0)).unwrap();
    assert!(next.in_check);
    assert!(!next.is_over());
    assert_eq!(next.history[0], "Ra1->a10+");
}

/// Random legal play from the opening. At every step the recorded flags must
/// agree with the detectors, both kings must stay on the board, and a game may
/// only end in checkmate or stalemate.
#[test]
fn random_games_keep_terminal_flags_consistent() {
    let mut rng = StdRng::seed_from_u64(0x10_10);

    for _ in 0..6 {
        let mut state = GameState::new();
        for _ in 0..150 {
            assert_eq!(state.board.count_kings(Color::White), 1);
            assert_eq!(state.board.count_kings(Color::Black), 1);
            assert!(state.validate_board_state().is_ok());

            let in_check = is_king_in_check(state.turn, &state.board);
            let can_move = has_any_legal_move(state.turn, &state.board);
            assert_eq!(state.in_check, in_check);

            match state.result {
                Some(GameResult::Checkmate(winner)) => {
                    assert!(in_check && !can_move);
                    assert_eq!(winner, state.turn.opposite());
                    break;
                }
                Some(GameResult::Stalemate) => {
                    assert!(!in_check && !can_move);
                    break;
                }
                Some(GameResult::KingCaptured(_)) => panic!("king captured in legal play"),
                None => assert!(can_move),
            }

            let moves = all_legal_moves(state.turn, &state.board);
            let &(from, to) = moves.choose(&mut rng).unwrap();
            state = state.try_move(from, to).unwrap();
        }
    }
}
