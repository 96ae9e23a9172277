//! The chess piece: kind, color, move counter, identity.

use std::fmt;

use serde::Serialize;

use crate::board::Occupant;
use crate::types::{Color, PieceType, Position};

// ---------------------------------------------------------------------------
// PieceId
// ---------------------------------------------------------------------------

/// Stable identity for a piece, assigned once at creation.
///
/// Positions change as pieces move and ownership shuttles between the board
/// and the captured ledger, so identity-sensitive state (the en-passant
/// vulnerable pawn) is tracked by id rather than by location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceId(pub(crate) u32);

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A chess piece.
///
/// The move counter gates first-move-only rules (pawn double-step, castling)
/// and is kept exactly symmetric under apply/undo — it is incremented on
/// every move including a castling rook's relocation, and decremented on
/// rollback.
#[derive(Clone, Debug)]
pub struct Piece {
    id: PieceId,
    kind: PieceType,
    color: Color,
    move_count: u32,
    position: Option<Position>,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceType, color: Color) -> Self {
        Piece {
            id,
            kind,
            color,
            move_count: 0,
            position: None,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceType {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// How many times this piece has moved.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub(crate) fn increase_move_count(&mut self) {
        self.move_count += 1;
    }

    pub(crate) fn decrease_move_count(&mut self) {
        debug_assert!(self.move_count > 0, "move count underflow");
        self.move_count -= 1;
    }

    /// Display glyph: uppercase for white, lowercase for black.
    pub fn glyph(&self) -> char {
        self.kind.to_char(self.color)
    }

    /// Read-only descriptor for rendering and API responses.
    pub fn descriptor(&self) -> PieceDescriptor {
        PieceDescriptor {
            kind: self.kind,
            color: self.color,
            glyph: self.glyph(),
        }
    }
}

impl Occupant for Piece {
    fn position(&self) -> Option<Position> {
        self.position
    }
    fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

// ---------------------------------------------------------------------------
// PieceDescriptor
// ---------------------------------------------------------------------------

/// Snapshot of a piece for display: variant tag, color, glyph. Carries no
/// reference back into the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceDescriptor {
    pub kind: PieceType,
    pub color: Color,
    pub glyph: char,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
