//////////////////////////
// game.rs
//////////////////////////

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Board;
use crate::check::is_king_in_check;
use crate::error::MoveError;
use crate::legal::{has_any_legal_move, legal_moves};
use crate::types::*;

/// One immutable snapshot of a game. Every accepted move produces a new value;
/// this is also what travels over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    /// Move records, most recent first.
    pub history: Vec<String>,
    pub result: Option<GameResult>,
    /// Whether `turn`'s king is attacked.
    pub in_check: bool,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            board: Board::initial(),
            turn: Color::White,
            history: Vec::new(),
            result: None,
            in_check: false,
        }
    }

    /// A fresh starting position, whatever came before.
    pub fn reset(&self) -> GameState {
        GameState::new()
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// `None` for a draw or an unfinished game.
    pub fn winner(&self) -> Option<Color> {
        self.result.and_then(|r| r.winner())
    }

    /// Moves `piece` to `target` without checking legality and evaluates the
    /// position for the side that moves next.
    pub fn apply_move(&self, piece: &Piece, target: Square) -> GameState {
        let next_board = self.board.with_move(piece.position, target);
        let next_turn = self.turn.opposite();
        let next_in_check = is_king_in_check(next_turn, &next_board);

        let result = if next_board.find_king(next_turn).is_none() {
            Some(GameResult::KingCaptured(self.turn))
        } else if !has_any_legal_move(next_turn, &next_board) {
            if next_in_check {
                Some(GameResult::Checkmate(self.turn))
            } else {
                Some(GameResult::Stalemate)
            }
        } else {
            None
        };

        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.push(move_notation(piece, piece.position, target, next_in_check));
        history.extend(self.history.iter().cloned());

        GameState {
            board: next_board,
            turn: next_turn,
            history,
            result,
            in_check: next_in_check,
        }
    }

    /// Validated move for the side to move.
    pub fn try_move(&self, from: Square, to: Square) -> Result<GameState, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if !Board::is_within_bounds(from) {
            return Err(MoveError::InvalidSquare(format!("{:?}", from)));
        }
        let piece = self.board.get(from).ok_or(MoveError::NoPieceAtSource)?;
        if piece.color != self.turn {
            return Err(MoveError::WrongColor(self.turn));
        }
        if !legal_moves(piece, &self.board).contains(&to) {
            return Err(MoveError::IllegalMove { from, to });
        }
        Ok(self.apply_move(piece, to))
    }

    pub fn try_move_from_str(&self, mv_str: &str) -> Result<GameState, MoveError> {
        let (from, to) = parse_move(mv_str)?;
        self.try_move(from, to)
    }

    /// Exactly one king per side and every piece where its cell says it is.
    pub fn validate_board_state(&self) -> Result<(), MoveError> {
        let white = self.board.count_kings(Color::White);
        let black = self.board.count_kings(Color::Black);
        if white != 1 || black != 1 {
            return Err(MoveError::KingCount { white, black });
        }
        for (cell, piece) in self.board.cells() {
            if let Some(piece) = piece {
                if piece.position != cell {
                    return Err(MoveError::MisplacedPiece {
                        cell,
                        stored: piece.position,
                    });
                }
            }
        }
        Ok(())
    }
}

/// `"a10"` is the top-left corner, `"j1"` the bottom-right.
pub fn parse_square(s: &str) -> Result<Square, MoveError> {
    let invalid = || MoveError::InvalidSquare(s.to_string());
    let mut chars = s.chars();
    let file = chars.next().ok_or_else(invalid)?.to_ascii_lowercase();
    if !file.is_ascii_lowercase() {
        return Err(invalid());
    }
    let col = (file as u8 - b'a') as usize;
    let rank: usize = chars.as_str().parse().map_err(|_| invalid())?;
    if col >= BOARD_SIZE || rank == 0 || rank > BOARD_SIZE {
        return Err(invalid());
    }
    Ok((BOARD_SIZE - rank, col))
}

/// Accepts `"b9b7"` or `"b9 b7"`.
pub fn parse_move(mv_str: &str) -> Result<(Square, Square), MoveError> {
    let compact: String = mv_str.chars().filter(|c| !c.is_whitespace()).collect();
    let split = compact
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .ok_or_else(|| MoveError::InvalidFormat(mv_str.to_string()))?;

    Ok((parse_square(&compact[..split])?, parse_square(&compact[split..])?))
}

pub fn square_name(square: Square) -> String {
    format!("{}{}", (b'a' + square.1 as u8) as char, BOARD_SIZE - square.0)
}

/// `P` `b9` `->` `b7`, with `+` when the move gives check.
pub fn move_notation(piece: &Piece, from: Square, to: Square, gives_check: bool) -> String {
    format!(
        "{}{}->{}{}",
        piece.piece_type.record_letter(),
        square_name(from),
        square_name(to),
        if gives_check { "+" } else { "" }
    )
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        match self.result {
            Some(result) => write!(f, "\n{}", result.to_string().bright_yellow().bold()),
            None if self.in_check => write!(
                f,
                "\nTurn: {} {}",
                self.turn,
                "(in check!)".bright_red().bold()
            ),
            None => write!(f, "\nTurn: {}", self.turn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_round_trip_through_names() {
        assert_eq!(parse_square("a10"), Ok((0, 0)));
        assert_eq!(parse_square("j1"), Ok((9, 9)));
        assert_eq!(parse_square("f1"), Ok((9, 5)));
        assert_eq!(square_name((8, 0)), "a2");
        assert!(parse_square("k1").is_err());
        assert!(parse_square("a0").is_err());
        assert!(parse_square("a11").is_err());
        assert!(parse_square("").is_err());
    }

    #[test]
    fn records_are_prepended_with_check_suffix() {
        let state = GameState::new().try_move_from_str("a2a4").unwrap();
        assert_eq!(state.history, vec!["Pa2->a4".to_string()]);
        assert_eq!(state.turn, Color::Black);

        let state = state.try_move_from_str("c9 c8").unwrap();
        assert_eq!(state.history, vec!["Pc9->c8", "Pa2->a4"]);
    }

    #[test]
    fn knight_records_use_k() {
        let state = GameState::new().try_move_from_str("c1b3").unwrap();
        assert_eq!(state.history[0], "Kc1->b3");
    }

    #[test]
    fn try_move_rejects_out_of_turn_and_illegal() {
        let state = GameState::new();
        assert_eq!(
            state.try_move_from_str("a9a8"),
            Err(MoveError::WrongColor(Color::White))
        );
        assert_eq!(state.try_move_from_str("e5e4"), Err(MoveError::NoPieceAtSource));
        assert!(matches!(
            state.try_move_from_str("a2a5"),
            Err(MoveError::IllegalMove { .. })
        ));
        assert!(matches!(
            state.try_move_from_str("a2"),
            Err(MoveError::InvalidFormat(_))
        ));
    }

    #[test]
    fn capturing_a_king_ends_the_game() {
        let state = GameState {
            board: Board::empty()
                .with_piece(PieceType::King, Color::White, (9, 0))
                .with_piece(PieceType::Rook, Color::White, (5, 0))
                .with_piece(PieceType::King, Color::Black, (5, 9)),
            turn: Color::White,
            history: Vec::new(),
            result: None,
            in_check: false,
        };
        let rook = *state.board.get((5, 0)).unwrap();
        let next = state.apply_move(&rook, (5, 9));
        assert_eq!(next.result, Some(GameResult::KingCaptured(Color::White)));
        assert_eq!(next.winner(), Some(Color::White));
        assert!(next.validate_board_state().is_err());
    }

    #[test]
    fn fresh_state_validates() {
        assert!(GameState::new().validate_board_state().is_ok());
    }
}
