//////////////////////////
// board.rs
//////////////////////////

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::*;

const BACK_RANK: [PieceType; BOARD_SIZE] = [
    PieceType::Pawn,
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
    PieceType::Pawn,
];

/// Indexed `[row][col]`. A stored piece's `position` always equals its cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Black on rows 0/1, white on rows 8/9, kings on column 5.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for (col, piece_type) in BACK_RANK.iter().enumerate() {
            board.place(Piece::new(*piece_type, Color::Black, (0, col)));
            board.place(Piece::new(PieceType::Pawn, Color::Black, (1, col)));
            board.place(Piece::new(PieceType::Pawn, Color::White, (BOARD_SIZE - 2, col)));
            board.place(Piece::new(*piece_type, Color::White, (BOARD_SIZE - 1, col)));
        }
        board
    }

    /// Builder used to set up arbitrary positions.
    pub fn with_piece(mut self, piece_type: PieceType, color: Color, at: Square) -> Self {
        self.place(Piece::new(piece_type, color, at));
        self
    }

    fn place(&mut self, piece: Piece) {
        let (row, col) = piece.position;
        self.squares[row][col] = Some(piece);
    }

    pub fn is_within_bounds(pos: Square) -> bool {
        pos.0 < BOARD_SIZE && pos.1 < BOARD_SIZE
    }

    /// `None` for an empty square or one off the board.
    pub fn get(&self, pos: Square) -> Option<&Piece> {
        self.squares.get(pos.0)?.get(pos.1)?.as_ref()
    }

    pub fn is_empty(&self, pos: Square) -> bool {
        self.get(pos).is_none()
    }

    /// Relocates the piece on `from` to `to`, removing whatever stood on `to`.
    /// No legality check.
    pub fn with_move(&self, from: Square, to: Square) -> Board {
        let mut next = self.clone();
        if !Board::is_within_bounds(from) || !Board::is_within_bounds(to) {
            return next;
        }
        if let Some(mut piece) = next.squares[from.0][from.1].take() {
            piece.position = to;
            piece.has_moved = true;
            next.squares[to.0][to.1] = Some(piece);
        }
        next
    }

    /// Rewrites each stored `position` to the cell the piece actually sits on.
    /// Boards from the wire carry positions nobody has checked.
    pub fn normalize_positions(&self) -> Board {
        let mut next = self.clone();
        for (row, rank) in next.squares.iter_mut().enumerate() {
            for (col, cell) in rank.iter_mut().enumerate() {
                if let Some(piece) = cell {
                    piece.position = (row, col);
                }
            }
        }
        next
    }

    /// Row-major scan.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.squares.iter().flatten().filter_map(|cell| cell.as_ref())
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |p| p.color == color)
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|p| p.piece_type == PieceType::King)
            .map(|p| p.position)
    }

    pub fn count_kings(&self, color: Color) -> usize {
        self.pieces_of(color)
            .filter(|p| p.piece_type == PieceType::King)
            .count()
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = (Square, Option<&Piece>)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| ((row, col), cell.as_ref()))
        })
    }
}

fn symbol(piece: &Piece) -> char {
    let c = match piece.piece_type {
        PieceType::Pawn => 'p',
        PieceType::Knight => 'n',
        PieceType::Bishop => 'b',
        PieceType::Rook => 'r',
        PieceType::Queen => 'q',
        PieceType::King => 'k',
    };
    match piece.color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

fn file_labels(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "    ")?;
    for col in 0..BOARD_SIZE {
        write!(f, " {} ", ((col as u8 + b'a') as char).to_string().cyan())?;
    }
    writeln!(f)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        file_labels(f)?;
        writeln!(f, "    {}", "─".repeat(3 * BOARD_SIZE).bright_magenta())?;

        for (row, cells) in self.squares.iter().enumerate() {
            let rank = format!("{:>2}", BOARD_SIZE - row);
            write!(f, "{} {}", rank.cyan(), "│".bright_magenta())?;
            for cell in cells {
                let shown = match cell {
                    Some(piece) if piece.color == Color::White => {
                        symbol(piece).to_string().bright_red()
                    }
                    Some(piece) => symbol(piece).to_string().bright_blue(),
                    None => "·".bright_magenta(),
                };
                write!(f, " {} ", shown)?;
            }
            writeln!(f, "{} {}", "│".bright_magenta(), rank.cyan())?;
        }

        writeln!(f, "    {}", "─".repeat(3 * BOARD_SIZE).bright_magenta())?;
        file_labels(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout_mirrors_both_sides() {
        let board = Board::initial();
        assert_eq!(board.pieces().count(), 40);
        assert_eq!(board.find_king(Color::White), Some((9, 5)));
        assert_eq!(board.find_king(Color::Black), Some((0, 5)));
        for col in 0..BOARD_SIZE {
            let white = board.get((9, col)).unwrap();
            let black = board.get((0, col)).unwrap();
            assert_eq!(white.piece_type, black.piece_type);
            assert_eq!(board.get((8, col)).unwrap().piece_type, PieceType::Pawn);
            assert_eq!(board.get((1, col)).unwrap().piece_type, PieceType::Pawn);
        }
        assert_eq!(board.get((9, 0)).unwrap().piece_type, PieceType::Pawn);
        assert_eq!(board.get((9, 4)).unwrap().piece_type, PieceType::Queen);
    }

    #[test]
    fn with_move_relocates_and_keeps_identity() {
        let board = Board::initial();
        let before = *board.get((8, 3)).unwrap();
        let next = board.with_move((8, 3), (6, 3));

        assert!(next.is_empty((8, 3)));
        let after = next.get((6, 3)).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.position, (6, 3));
        assert!(after.has_moved);
        // the source board is untouched
        assert_eq!(board.get((8, 3)), Some(&before));
    }

    #[test]
    fn with_move_removes_the_occupant_even_a_king() {
        let board = Board::empty()
            .with_piece(PieceType::Rook, Color::White, (5, 0))
            .with_piece(PieceType::King, Color::Black, (5, 9));
        let next = board.with_move((5, 0), (5, 9));
        assert_eq!(next.count_kings(Color::Black), 0);
        assert_eq!(next.pieces().count(), 1);
    }

    #[test]
    fn with_move_from_empty_square_is_a_copy() {
        let board = Board::initial();
        assert_eq!(board.with_move((5, 5), (4, 5)), board);
    }

    #[test]
    fn off_board_squares_read_as_empty() {
        let board = Board::initial();
        assert_eq!(board.get((10, 0)), None);
        assert_eq!(board.get((0, 99)), None);
        assert_eq!(board.with_move((9, 5), (99, 5)), board);
    }

    #[test]
    fn normalize_rewrites_stray_positions() {
        let mut board = Board::initial();
        if let Some(rook) = board.squares[9][1].as_mut() {
            rook.position = (99, 5);
        }
        let fixed = board.normalize_positions();
        assert_eq!(fixed.get((9, 1)).unwrap().position, (9, 1));
        assert_eq!(fixed, Board::initial());
    }
}
