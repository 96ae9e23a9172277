//! Stateful match controller.
//!
//! `Game` orchestrates turns: it validates move requests, applies them to
//! the board, rejects any move that would leave the mover's own king in
//! check (speculative apply, test, rollback), maintains the check/checkmate
//! flags and the en-passant-vulnerable pawn, and keeps the captured-piece
//! ledger and move history. It is the type external adapters (CLI, UI,
//! transport) interact with.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::board::Board;
use crate::movegen::{self, MoveContext};
use crate::piece::{Piece, PieceDescriptor, PieceId};
use crate::types::{ChessError, Color, MoveMatrix, PieceType, Position};

// =========================================================================
// MoveRecord
// =========================================================================

/// A committed move in the game history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Position,
    pub to: Position,
    pub piece: PieceType,
    pub color: Color,
    /// Kind of the piece captured by this move, if any.
    pub captured: Option<PieceType>,
}

// =========================================================================
// UndoInfo
// =========================================================================

/// Everything needed to reverse one applied move: where the mover came from,
/// where any captured piece stood (the en-passant victim does not stand on
/// the target square), and the rook relocation if the move was castling.
#[derive(Clone, Copy, Debug)]
struct UndoInfo {
    source: Position,
    target: Position,
    captured_square: Option<Position>,
    rook_move: Option<(Position, Position)>,
}

// =========================================================================
// Game
// =========================================================================

/// A chess match: one board, turn bookkeeping, and the move state machine.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board<Piece>,
    turn: u32,
    current_player: Color,
    /// Whether the player to move is in check.
    check: bool,
    /// Terminal flag: once set, no further moves are accepted.
    checkmate: bool,
    /// The pawn that double-stepped on the immediately preceding turn, if
    /// any. Overwritten on every commit, never accumulates.
    en_passant_vulnerable: Option<PieceId>,
    /// Pieces removed from play, in capture order. Ownership transfers here
    /// from the board; the pieces remain inspectable.
    captured: Vec<Piece>,
    history: Vec<MoveRecord>,
    next_piece_id: u32,

    // Metadata
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// A standard 8×8 match with the full initial piece placement.
    pub fn new() -> Self {
        Self::with_dimensions(8, 8).expect("standard 8x8 board is valid")
    }

    /// A match on a `rows`×`columns` board with the standard initial
    /// placement.
    ///
    /// Fails with `InvalidDimensions` if either dimension is below 1, or
    /// `OutOfBounds` if the board cannot hold the standard setup.
    pub fn with_dimensions(rows: i16, columns: i16) -> Result<Self, ChessError> {
        let mut game = Self::empty(rows, columns)?;
        game.initial_setup()?;
        Ok(game)
    }

    /// An empty match with no pieces placed, for constructing custom
    /// positions via `place_piece`.
    pub fn empty(rows: i16, columns: i16) -> Result<Self, ChessError> {
        Ok(Game {
            board: Board::new(rows, columns)?,
            turn: 1,
            current_player: Color::White,
            check: false,
            checkmate: false,
            en_passant_vulnerable: None,
            captured: Vec::new(),
            history: Vec::new(),
            next_piece_id: 0,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        })
    }

    /// Create a new piece and place it on the board.
    pub fn place_piece(
        &mut self,
        kind: PieceType,
        color: Color,
        position: Position,
    ) -> Result<(), ChessError> {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id += 1;
        self.board.place(Piece::new(id, kind, color), position)
    }

    fn initial_setup(&mut self) -> Result<(), ChessError> {
        use Color::{Black, White};
        use PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};

        // Back ranks: black on row 0, white on row 7.
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        for (column, &kind) in back_rank.iter().enumerate() {
            self.place_piece(kind, Black, Position::new(0, column as i16))?;
            self.place_piece(kind, White, Position::new(7, column as i16))?;
        }
        for column in 0..8 {
            self.place_piece(Pawn, Black, Position::new(1, column))?;
            self.place_piece(Pawn, White, Position::new(6, column))?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Turn number, starting at 1. Advances only on a committed move that
    /// does not end the game.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The player whose move it is.
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    /// Whether the player to move is in check.
    pub fn is_check(&self) -> bool {
        self.check
    }

    /// Whether the match has ended in checkmate.
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// The board, read-only.
    pub fn board(&self) -> &Board<Piece> {
        &self.board
    }

    /// Position of the pawn currently capturable en passant, if any.
    pub fn en_passant_vulnerable(&self) -> Option<Position> {
        let id = self.en_passant_vulnerable?;
        self.board
            .occupants()
            .find(|(_, p)| p.id() == id)
            .map(|(pos, _)| pos)
    }

    /// Pieces removed from play, in capture order.
    pub fn captured_pieces(&self) -> &[Piece] {
        &self.captured
    }

    /// Committed move history.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.history
    }

    // -----------------------------------------------------------------
    // Rendering support
    // -----------------------------------------------------------------

    /// Read-only grid of piece descriptors, row 0 first, for rendering.
    pub fn board_snapshot(&self) -> Vec<Vec<Option<PieceDescriptor>>> {
        let mut grid = Vec::with_capacity(self.board.rows() as usize);
        for row in 0..self.board.rows() {
            let mut cells = Vec::with_capacity(self.board.columns() as usize);
            for column in 0..self.board.columns() {
                let cell = self
                    .board
                    .occupant_at(Position::new(row, column))
                    .expect("row/column within bounds")
                    .map(|p| p.descriptor());
                cells.push(cell);
            }
            grid.push(cells);
        }
        grid
    }

    /// Render the board as a text grid (row 0 at the top), useful for
    /// debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::new();
        for row in 0..self.board.rows() {
            for column in 0..self.board.columns() {
                let glyph = self
                    .board
                    .occupant_at(Position::new(row, column))
                    .expect("row/column within bounds")
                    .map(|p| p.glyph())
                    .unwrap_or('.');
                s.push(glyph);
                if column < self.board.columns() - 1 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s
    }

    // -----------------------------------------------------------------
    // Move queries
    // -----------------------------------------------------------------

    /// The legality matrix for the piece on `position`.
    pub fn legal_moves(&self, position: Position) -> Result<MoveMatrix, ChessError> {
        let piece = self
            .board
            .occupant_at(position)?
            .ok_or(ChessError::NoPieceAtSource(position))?;
        let ctx = self.move_context_for(piece.color());
        Ok(movegen::possible_moves(piece, &self.board, &ctx))
    }

    fn move_context_for(&self, color: Color) -> MoveContext {
        MoveContext {
            // The check flag always refers to the player to move.
            in_check: self.check && color == self.current_player,
            en_passant_vulnerable: self.en_passant_vulnerable,
        }
    }

    // -----------------------------------------------------------------
    // Perform move
    // -----------------------------------------------------------------

    /// Play a move for the current player.
    ///
    /// Validates source and target, applies the move, rejects it with a full
    /// rollback if it leaves the mover's own king attacked, and otherwise
    /// commits: updates the check/checkmate flags, the en-passant-vulnerable
    /// pawn, and the turn. Returns a descriptor of the captured piece, if
    /// any.
    pub fn perform_move(
        &mut self,
        source: Position,
        target: Position,
    ) -> Result<Option<PieceDescriptor>, ChessError> {
        if self.checkmate {
            return Err(ChessError::GameOver);
        }
        self.validate_source(source)?;
        self.validate_target(source, target)?;

        let undo = self.apply_move(source, target);

        if self.in_check(self.current_player) {
            self.undo_move(undo);
            debug!(%source, %target, "move rejected: self-check");
            return Err(ChessError::SelfCheck {
                from: source,
                to: target,
            });
        }

        let captured = match undo.captured_square {
            Some(_) => self.captured.last().map(|p| p.descriptor()),
            None => None,
        };
        let (mover_id, mover_kind, mover_color) = {
            let mover = self
                .board
                .occupant_at(target)
                .expect("target within bounds")
                .expect("mover placed on target");
            (mover.id(), mover.kind(), mover.color())
        };

        let opponent = !self.current_player;
        self.check = self.in_check(opponent);
        if self.test_checkmate(opponent) {
            self.checkmate = true;
            debug!(winner = %mover_color, "checkmate");
        } else {
            self.next_turn();
        }

        // Only a pawn that advanced exactly two rows is capturable en
        // passant; any other committed move clears the reference.
        self.en_passant_vulnerable =
            if mover_kind == PieceType::Pawn && (target.row - source.row).abs() == 2 {
                Some(mover_id)
            } else {
                None
            };

        self.history.push(MoveRecord {
            from: source,
            to: target,
            piece: mover_kind,
            color: mover_color,
            captured: captured.map(|d| d.kind),
        });
        debug!(player = %mover_color, %source, %target, check = self.check, "move committed");

        Ok(captured)
    }

    // -----------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------

    fn validate_source(&self, source: Position) -> Result<(), ChessError> {
        let piece = self
            .board
            .occupant_at(source)?
            .ok_or(ChessError::NoPieceAtSource(source))?;
        if piece.color() != self.current_player {
            return Err(ChessError::WrongColor(source));
        }
        let ctx = self.move_context_for(piece.color());
        if !movegen::possible_moves(piece, &self.board, &ctx).any() {
            return Err(ChessError::NoLegalMoves(source));
        }
        Ok(())
    }

    fn validate_target(&self, source: Position, target: Position) -> Result<(), ChessError> {
        let piece = self
            .board
            .occupant_at(source)?
            .expect("source validated before target");
        let ctx = self.move_context_for(piece.color());
        if !movegen::possible_moves(piece, &self.board, &ctx).is_set(target) {
            return Err(ChessError::IllegalTarget {
                from: source,
                to: target,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Apply / undo (exact structural inverses)
    // -----------------------------------------------------------------

    /// Take the piece at `position` off the board. Callers guarantee the
    /// slot is valid and occupied.
    fn take_at(&mut self, position: Position) -> Piece {
        self.board
            .remove(position)
            .expect("position within bounds")
            .expect("slot occupied")
    }

    /// Put a piece into a slot known to be empty.
    fn put_at(&mut self, piece: Piece, position: Position) {
        self.board
            .place(piece, position)
            .expect("slot known to be empty");
    }

    /// Mutate the board for a validated move: relocate the mover, transfer
    /// any captured piece to the ledger, and perform the castling/en-passant
    /// side effects. Returns the information `undo_move` needs.
    fn apply_move(&mut self, source: Position, target: Position) -> UndoInfo {
        let mut mover = self.take_at(source);
        mover.increase_move_count();
        let kind = mover.kind();

        let mut captured_square = None;
        if let Some(captured) = self
            .board
            .remove(target)
            .expect("target within bounds")
        {
            self.captured.push(captured);
            captured_square = Some(target);
        }
        self.put_at(mover, target);

        // Castling: a king's two-square horizontal shift relocates the
        // corresponding rook, whose move also counts.
        let mut rook_move = None;
        if kind == PieceType::King && (target.column - source.column).abs() == 2 {
            let (rook_from, rook_to) = if target.column > source.column {
                (source.offset(0, 3), source.offset(0, 1))
            } else {
                (source.offset(0, -4), source.offset(0, -1))
            };
            let mut rook = self.take_at(rook_from);
            rook.increase_move_count();
            self.put_at(rook, rook_to);
            rook_move = Some((rook_from, rook_to));
        }

        // En passant: a pawn moving diagonally onto an empty square captures
        // the pawn it bypassed, which stands beside the source on the
        // target's file.
        if kind == PieceType::Pawn && source.column != target.column && captured_square.is_none() {
            let bypassed = Position::new(source.row, target.column);
            let victim = self.take_at(bypassed);
            self.captured.push(victim);
            captured_square = Some(bypassed);
        }

        UndoInfo {
            source,
            target,
            captured_square,
            rook_move,
        }
    }

    /// Reverse a move applied by `apply_move`, restoring occupancy, move
    /// counters, and captured-ledger membership exactly.
    fn undo_move(&mut self, undo: UndoInfo) {
        let mut mover = self.take_at(undo.target);
        mover.decrease_move_count();
        self.put_at(mover, undo.source);

        if let Some((rook_from, rook_to)) = undo.rook_move {
            let mut rook = self.take_at(rook_to);
            rook.decrease_move_count();
            self.put_at(rook, rook_from);
        }

        if let Some(square) = undo.captured_square {
            let piece = self
                .captured
                .pop()
                .expect("captured ledger holds the piece this move took");
            self.put_at(piece, square);
        }
    }

    fn next_turn(&mut self) {
        self.turn += 1;
        self.current_player = !self.current_player;
    }

    // -----------------------------------------------------------------
    // Check / checkmate
    // -----------------------------------------------------------------

    /// Where the `color` king stands. Exactly one king per color must be on
    /// the board; absence is a broken internal invariant, not a user error.
    fn king_position(&self, color: Color) -> Position {
        self.board
            .occupants()
            .find(|(_, p)| p.color() == color && p.kind() == PieceType::King)
            .map(|(pos, _)| pos)
            .unwrap_or_else(|| panic!("there is no {color} king on the board"))
    }

    /// Is the `color` king attacked by any opposing piece? Re-derived from
    /// live board state on every call.
    pub fn in_check(&self, color: Color) -> bool {
        let king = self.king_position(color);
        movegen::square_attacked(&self.board, king, !color)
    }

    /// Exhaustive checkmate test: for every legal destination of every
    /// `color` piece, speculatively apply the move, test check, and undo.
    /// Checkmate iff no trial leaves the king safe.
    fn test_checkmate(&mut self, color: Color) -> bool {
        if !self.in_check(color) {
            return false;
        }
        let ctx = MoveContext {
            in_check: true,
            en_passant_vulnerable: self.en_passant_vulnerable,
        };
        // Candidates are collected up front; the board mutates during the
        // trials below.
        let candidates: Vec<(Position, MoveMatrix)> = self
            .board
            .occupants()
            .filter(|(_, p)| p.color() == color)
            .map(|(pos, p)| (pos, movegen::possible_moves(p, &self.board, &ctx)))
            .collect();

        for (source, matrix) in candidates {
            for target in matrix.iter() {
                let undo = self.apply_move(source, target);
                let still_in_check = self.in_check(color);
                self.undo_move(undo);
                if !still_in_check {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// =========================================================================
// Tests
// =========================================================================
