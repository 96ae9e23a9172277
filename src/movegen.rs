//! Per-piece move generation.
//!
//! Every generator produces a pseudo-legal `MoveMatrix` from current board
//! occupancy — consistent with the piece's movement pattern but without
//! asking whether the move exposes the mover's own king. That filter is the
//! game controller's job (speculative apply, check test, rollback).
//!
//! Matrices are recomputed on every call. The board mutates between calls,
//! so nothing here caches.

use crate::board::{Board, Occupant};
use crate::piece::{Piece, PieceId};
use crate::types::{Color, MoveMatrix, PieceType, Position};

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

const ROOK_DIRECTIONS: [(i16, i16); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const BISHOP_DIRECTIONS: [(i16, i16); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const KING_DIRECTIONS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KNIGHT_OFFSETS: [(i16, i16); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

// ---------------------------------------------------------------------------
// MoveContext
// ---------------------------------------------------------------------------

/// Match state the generators need beyond raw occupancy.
///
/// The king consults `in_check` to gate castling; the pawn consults
/// `en_passant_vulnerable` to recognize an en-passant capture.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveContext {
    /// Whether the side owning the generating piece is currently in check.
    pub in_check: bool,
    /// The pawn, if any, that double-stepped on the immediately preceding
    /// turn.
    pub en_passant_vulnerable: Option<PieceId>,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// The legality matrix for `piece` on `board`: one boolean per square, true
/// where the piece may currently move.
///
/// A piece that is not on the board has no moves.
pub fn possible_moves(piece: &Piece, board: &Board<Piece>, ctx: &MoveContext) -> MoveMatrix {
    let mut matrix = MoveMatrix::new(board.rows(), board.columns());
    let Some(from) = piece.position() else {
        return matrix;
    };

    match piece.kind() {
        PieceType::Rook => slider_moves(piece, from, board, &ROOK_DIRECTIONS, &mut matrix),
        PieceType::Bishop => slider_moves(piece, from, board, &BISHOP_DIRECTIONS, &mut matrix),
        PieceType::Queen => {
            slider_moves(piece, from, board, &ROOK_DIRECTIONS, &mut matrix);
            slider_moves(piece, from, board, &BISHOP_DIRECTIONS, &mut matrix);
        }
        PieceType::Knight => knight_moves(piece, from, board, &mut matrix),
        PieceType::King => king_moves(piece, from, board, ctx, &mut matrix),
        PieceType::Pawn => pawn_moves(piece, from, board, ctx, &mut matrix),
    }
    matrix
}

/// The squares `piece` attacks, for check detection and castling-path
/// safety.
///
/// Differs from `possible_moves` where movement and attack diverge: pawn
/// pushes are not attacks and pawn diagonals attack even when empty, and the
/// king contributes only its adjacency (castling never attacks anything).
pub fn attack_matrix(piece: &Piece, board: &Board<Piece>) -> MoveMatrix {
    let mut matrix = MoveMatrix::new(board.rows(), board.columns());
    let Some(from) = piece.position() else {
        return matrix;
    };

    match piece.kind() {
        PieceType::Rook => slider_attacks(from, board, &ROOK_DIRECTIONS, &mut matrix),
        PieceType::Bishop => slider_attacks(from, board, &BISHOP_DIRECTIONS, &mut matrix),
        PieceType::Queen => {
            slider_attacks(from, board, &ROOK_DIRECTIONS, &mut matrix);
            slider_attacks(from, board, &BISHOP_DIRECTIONS, &mut matrix);
        }
        PieceType::Knight => {
            for &(dr, dc) in &KNIGHT_OFFSETS {
                matrix.set(from.offset(dr, dc));
            }
        }
        PieceType::King => {
            for &(dr, dc) in &KING_DIRECTIONS {
                matrix.set(from.offset(dr, dc));
            }
        }
        PieceType::Pawn => {
            let dir = advance_direction(piece.color());
            matrix.set(from.offset(dir, -1));
            matrix.set(from.offset(dir, 1));
        }
    }
    matrix
}

/// Is `position` attacked by any piece of color `by`?
pub fn square_attacked(board: &Board<Piece>, position: Position, by: Color) -> bool {
    board
        .occupants()
        .filter(|(_, p)| p.color() == by)
        .any(|(_, p)| attack_matrix(p, board).is_set(position))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Row direction a pawn advances in: black toward increasing row (row 0 is
/// Black's back rank), white toward decreasing row.
fn advance_direction(color: Color) -> i16 {
    match color {
        Color::Black => 1,
        Color::White => -1,
    }
}

/// The occupant at `position`, or `None` when the position is off the board
/// or the slot is empty.
fn occupant_at(board: &Board<Piece>, position: Position) -> Option<&Piece> {
    board.occupant_at(position).ok().flatten()
}

/// A step target is open when it exists and is empty or holds an opponent.
fn can_move_to(piece: &Piece, board: &Board<Piece>, position: Position) -> bool {
    if !board.position_exists(position) {
        return false;
    }
    match occupant_at(board, position) {
        None => true,
        Some(other) => other.color() != piece.color(),
    }
}

fn is_opponent(piece: &Piece, board: &Board<Piece>, position: Position) -> bool {
    matches!(occupant_at(board, position), Some(other) if other.color() != piece.color())
}

fn is_empty(board: &Board<Piece>, position: Position) -> bool {
    board.position_exists(position) && occupant_at(board, position).is_none()
}

// ---------------------------------------------------------------------------
// Sliders (rook, bishop, queen)
// ---------------------------------------------------------------------------

/// Walk each direction outward: empty squares are reachable and scanning
/// continues past them; an opponent square is reachable and ends the scan; an
/// own piece or the board edge ends the scan immediately.
fn slider_moves(
    piece: &Piece,
    from: Position,
    board: &Board<Piece>,
    directions: &[(i16, i16)],
    matrix: &mut MoveMatrix,
) {
    for &(dr, dc) in directions {
        let mut p = from.offset(dr, dc);
        while is_empty(board, p) {
            matrix.set(p);
            p = p.offset(dr, dc);
        }
        if is_opponent(piece, board, p) {
            matrix.set(p);
        }
    }
}

/// Same walk but the first blocker is attacked regardless of its color.
fn slider_attacks(
    from: Position,
    board: &Board<Piece>,
    directions: &[(i16, i16)],
    matrix: &mut MoveMatrix,
) {
    for &(dr, dc) in directions {
        let mut p = from.offset(dr, dc);
        while is_empty(board, p) {
            matrix.set(p);
            p = p.offset(dr, dc);
        }
        if board.position_exists(p) {
            matrix.set(p);
        }
    }
}

// ---------------------------------------------------------------------------
// Knight
// ---------------------------------------------------------------------------

fn knight_moves(piece: &Piece, from: Position, board: &Board<Piece>, matrix: &mut MoveMatrix) {
    for &(dr, dc) in &KNIGHT_OFFSETS {
        let p = from.offset(dr, dc);
        if can_move_to(piece, board, p) {
            matrix.set(p);
        }
    }
}

// ---------------------------------------------------------------------------
// King
// ---------------------------------------------------------------------------

fn king_moves(
    piece: &Piece,
    from: Position,
    board: &Board<Piece>,
    ctx: &MoveContext,
    matrix: &mut MoveMatrix,
) {
    for &(dr, dc) in &KING_DIRECTIONS {
        let p = from.offset(dr, dc);
        if can_move_to(piece, board, p) {
            matrix.set(p);
        }
    }

    // Castling: first move of the king, not currently in check, the
    // corresponding rook unmoved at its fixed offset, every square strictly
    // between empty, and the king's transit squares not attacked. The king's
    // two-square destination is marked; relocating the rook is a side effect
    // of move execution, not part of the matrix.
    if piece.move_count() == 0 && !ctx.in_check {
        let opponent = !piece.color();

        // Short (kingside): rook three columns to the right.
        if is_castling_partner(piece, board, from.offset(0, 3))
            && is_empty(board, from.offset(0, 1))
            && is_empty(board, from.offset(0, 2))
            && !square_attacked(board, from.offset(0, 1), opponent)
            && !square_attacked(board, from.offset(0, 2), opponent)
        {
            matrix.set(from.offset(0, 2));
        }

        // Long (queenside): rook four columns to the left. The square next
        // to the rook must be empty but is not on the king's path, so it
        // need not be safe.
        if is_castling_partner(piece, board, from.offset(0, -4))
            && is_empty(board, from.offset(0, -1))
            && is_empty(board, from.offset(0, -2))
            && is_empty(board, from.offset(0, -3))
            && !square_attacked(board, from.offset(0, -1), opponent)
            && !square_attacked(board, from.offset(0, -2), opponent)
        {
            matrix.set(from.offset(0, -2));
        }
    }
}

/// An unmoved rook of the king's own color.
fn is_castling_partner(king: &Piece, board: &Board<Piece>, position: Position) -> bool {
    matches!(
        occupant_at(board, position),
        Some(p) if p.kind() == PieceType::Rook
            && p.color() == king.color()
            && p.move_count() == 0
    )
}

// ---------------------------------------------------------------------------
// Pawn
// ---------------------------------------------------------------------------

fn pawn_moves(
    piece: &Piece,
    from: Position,
    board: &Board<Piece>,
    ctx: &MoveContext,
    matrix: &mut MoveMatrix,
) {
    let dir = advance_direction(piece.color());

    // Single advance onto an empty square.
    let one = from.offset(dir, 0);
    if is_empty(board, one) {
        matrix.set(one);

        // Double advance: first move only, intermediate square also empty.
        let two = from.offset(dir * 2, 0);
        if piece.move_count() == 0 && is_empty(board, two) {
            matrix.set(two);
        }
    }

    // Diagonal captures.
    for dc in [-1, 1] {
        let diag = from.offset(dir, dc);
        if is_opponent(piece, board, diag) {
            matrix.set(diag);
        }
    }

    // En passant: an orthogonally adjacent square holds the pawn that just
    // double-stepped; the capture lands on the empty square behind it.
    if let Some(vulnerable) = ctx.en_passant_vulnerable {
        for dc in [-1, 1] {
            let side = from.offset(0, dc);
            if let Some(other) = occupant_at(board, side) {
                if other.color() != piece.color() && other.id() == vulnerable {
                    matrix.set(from.offset(dir, dc));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
