//! A chess rules engine.
//!
//! Board state, legal move generation, and match orchestration with check,
//! checkmate, castling, and en passant. The crate has no I/O surface of its
//! own: [`Game`] is the entry point, and callers drive it with `(row,
//! column)` coordinates (row 0 is Black's back rank).
//!
//! ```
//! use chess_rules::{Game, Position};
//!
//! let mut game = Game::new();
//! // 1. e4
//! game.perform_move(Position::new(6, 4), Position::new(4, 4)).unwrap();
//! assert!(!game.is_check());
//! ```
//!
//! Layers, bottom up:
//!
//! - [`types`]: colors, piece kinds, coordinates, legality matrices, errors
//! - [`board`]: the generic slot grid that owns on-board pieces
//! - [`piece`]: the piece itself and its display descriptor
//! - [`movegen`]: per-kind pseudo-legal move and attack generation
//! - [`game`]: turn state machine, self-check rejection, checkmate detection

pub mod board;
pub mod game;
pub mod movegen;
pub mod piece;
pub mod types;

pub use board::{Board, Occupant};
pub use game::{Game, MoveRecord};
pub use movegen::{possible_moves, square_attacked, MoveContext};
pub use piece::{Piece, PieceDescriptor, PieceId};
pub use types::{ChessError, Color, MoveMatrix, PieceType, Position};
