//! Core value types: colors, piece kinds, board coordinates, legality
//! matrices, and the domain error enum.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A (row, column) board coordinate, 0-indexed from the top-left corner
/// (row 0 is Black's back rank).
///
/// A `Position` carries no validity guarantee of its own: whether it lies on
/// a given board is always judged by that board. Signed fields let offset
/// arithmetic step off the edge and be rejected by the bounds check rather
/// than wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i16,
    pub column: i16,
}

impl Position {
    pub fn new(row: i16, column: i16) -> Self {
        Position { row, column }
    }

    /// The position displaced by `(d_row, d_column)`.
    #[inline]
    pub fn offset(self, d_row: i16, d_column: i16) -> Self {
        Position {
            row: self.row + d_row,
            column: self.column + d_column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

// ---------------------------------------------------------------------------
// MoveMatrix
// ---------------------------------------------------------------------------

/// A boolean grid with one cell per board square, true where a piece may
/// currently move. Recomputed from live board state on every request, never
/// cached across calls.
#[derive(Clone, PartialEq, Eq)]
pub struct MoveMatrix {
    rows: i16,
    columns: i16,
    cells: Vec<bool>,
}

impl MoveMatrix {
    /// An all-false matrix with the given dimensions.
    pub fn new(rows: i16, columns: i16) -> Self {
        debug_assert!(rows >= 1 && columns >= 1);
        MoveMatrix {
            rows,
            columns,
            cells: vec![false; rows as usize * columns as usize],
        }
    }

    pub fn rows(&self) -> i16 {
        self.rows
    }

    pub fn columns(&self) -> i16 {
        self.columns
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= 0 && pos.row < self.rows && pos.column >= 0 && pos.column < self.columns {
            Some(pos.row as usize * self.columns as usize + pos.column as usize)
        } else {
            None
        }
    }

    /// Whether the cell at `pos` is marked. Off-matrix positions are never
    /// marked.
    #[inline]
    pub fn is_set(&self, pos: Position) -> bool {
        self.index(pos).map(|i| self.cells[i]).unwrap_or(false)
    }

    /// Mark the cell at `pos`. Off-matrix positions are ignored.
    #[inline]
    pub fn set(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = true;
        }
    }

    /// Is any cell marked?
    pub fn any(&self) -> bool {
        self.cells.iter().any(|&c| c)
    }

    /// Number of marked cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate over all marked positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, &set)| {
            if set {
                Some(Position::new(
                    (i / self.columns as usize) as i16,
                    (i % self.columns as usize) as i16,
                ))
            } else {
                None
            }
        })
    }
}

impl fmt::Debug for MoveMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MoveMatrix({}x{})", self.rows, self.columns)?;
        for row in 0..self.rows {
            write!(f, "  ")?;
            for column in 0..self.columns {
                let marked = self.is_set(Position::new(row, column));
                write!(f, "{}", if marked { '1' } else { '.' })?;
                if column < self.columns - 1 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine.
///
/// All variants are recoverable, user-input-class failures reported at the
/// point of the offending call. No variant leaves the match state mutated:
/// every validation runs before any board change, except `SelfCheck`, which
/// is detected after a speculative application and always paired with a full
/// rollback before the error surfaces.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("board must have at least 1 row and 1 column, got {rows}x{columns}")]
    InvalidDimensions { rows: i16, columns: i16 },

    #[error("position {0} does not exist on this board")]
    OutOfBounds(Position),

    #[error("position {0} is already occupied")]
    SlotOccupied(Position),

    #[error("there is no piece on source position {0}")]
    NoPieceAtSource(Position),

    #[error("the piece on {0} belongs to the opponent")]
    WrongColor(Position),

    #[error("there are no possible moves for the piece on {0}")]
    NoLegalMoves(Position),

    #[error("the piece on {from} cannot reach {to}")]
    IllegalTarget { from: Position, to: Position },

    #[error("move {from} -> {to} would leave your own king in check")]
    SelfCheck { from: Position, to: Position },

    #[error("the game is already over: checkmate")]
    GameOver,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
