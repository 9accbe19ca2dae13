//////////////////////////
// types.rs
//////////////////////////

use serde::{Deserialize, Serialize};
use std::fmt;

pub const BOARD_SIZE: usize = 10;

/// `(row, col)`. Row 0 is black's back rank, row 9 is white's.
pub type Square = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    /// Letter used in move records: first letter of the name, upper-cased.
    /// Knight and king share `K`.
    pub fn record_letter(&self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Rook => 'R',
            PieceType::Knight => 'K',
            PieceType::Bishop => 'B',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row offset of a forward pawn step.
    pub fn pawn_direction(&self) -> isize {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row from which a pawn may advance two squares.
    pub fn pawn_start_row(&self) -> usize {
        match self {
            Color::White => BOARD_SIZE - 2,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Stable identity of a piece, assigned when the piece is first placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl PieceId {
    pub fn from_origin(square: Square) -> Self {
        PieceId((square.0 * BOARD_SIZE + square.1) as u16)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub piece_type: PieceType,
    pub color: Color,
    pub position: Square,
    /// Reserved. Set on every move, read by no rule.
    pub has_moved: bool,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color, position: Square) -> Self {
        Piece {
            id: PieceId::from_origin(position),
            piece_type,
            color,
            position,
            has_moved: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Winner's color.
    Checkmate(Color),
    Stalemate,
    /// A king left the board. Winner's color.
    KingCaptured(Color),
}

impl GameResult {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameResult::Checkmate(c) | GameResult::KingCaptured(c) => Some(*c),
            GameResult::Stalemate => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Checkmate(winner) => write!(f, "Checkmate! {} wins", winner),
            GameResult::Stalemate => write!(f, "Stalemate, the game is drawn"),
            GameResult::KingCaptured(winner) => write!(f, "King captured! {} wins", winner),
        }
    }
}
