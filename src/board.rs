//! Generic rectangular board of occupant slots.
//!
//! `Board` owns placement and removal and knows nothing about chess: move
//! rules live in `movegen`, turn orchestration in `game`. The one contract it
//! enforces is grid/occupant consistency — a non-empty slot's occupant always
//! records that exact position as its current location.

use crate::types::{ChessError, Position};

// ---------------------------------------------------------------------------
// Occupant
// ---------------------------------------------------------------------------

/// Something that can sit in a board slot and remember where it is.
///
/// The board updates the stored position on every place/remove so the
/// occupant's view and the grid never disagree.
pub trait Occupant {
    fn position(&self) -> Option<Position>;
    fn set_position(&mut self, position: Option<Position>);
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A fixed-size rectangular grid, each slot holding at most one occupant.
///
/// The board is the sole owner of on-board occupants: `place` moves an
/// occupant in, `remove` moves it back out to the caller.
#[derive(Clone, Debug)]
pub struct Board<T: Occupant> {
    rows: i16,
    columns: i16,
    slots: Vec<Option<T>>,
}

impl<T: Occupant> Board<T> {
    /// Create an empty board. Fails if either dimension is below 1.
    pub fn new(rows: i16, columns: i16) -> Result<Self, ChessError> {
        if rows < 1 || columns < 1 {
            return Err(ChessError::InvalidDimensions { rows, columns });
        }
        let mut slots = Vec::with_capacity(rows as usize * columns as usize);
        slots.resize_with(rows as usize * columns as usize, || None);
        Ok(Board {
            rows,
            columns,
            slots,
        })
    }

    pub fn rows(&self) -> i16 {
        self.rows
    }

    pub fn columns(&self) -> i16 {
        self.columns
    }

    /// Whether `position` lies within the grid. Never fails.
    #[inline]
    pub fn position_exists(&self, position: Position) -> bool {
        position.row >= 0
            && position.row < self.rows
            && position.column >= 0
            && position.column < self.columns
    }

    #[inline]
    fn index(&self, position: Position) -> Result<usize, ChessError> {
        if self.position_exists(position) {
            Ok(position.row as usize * self.columns as usize + position.column as usize)
        } else {
            Err(ChessError::OutOfBounds(position))
        }
    }

    /// The occupant at `position`, if any.
    pub fn occupant_at(&self, position: Position) -> Result<Option<&T>, ChessError> {
        let i = self.index(position)?;
        Ok(self.slots[i].as_ref())
    }

    /// Whether the slot at `position` holds an occupant.
    pub fn is_occupied(&self, position: Position) -> Result<bool, ChessError> {
        let i = self.index(position)?;
        Ok(self.slots[i].is_some())
    }

    /// Place an occupant into an empty slot, recording the position on it.
    ///
    /// Fails with `SlotOccupied` if the slot already holds an occupant —
    /// callers must `remove` first, the board never overwrites silently.
    pub fn place(&mut self, mut occupant: T, position: Position) -> Result<(), ChessError> {
        let i = self.index(position)?;
        if self.slots[i].is_some() {
            return Err(ChessError::SlotOccupied(position));
        }
        occupant.set_position(Some(position));
        self.slots[i] = Some(occupant);
        Ok(())
    }

    /// Take the occupant out of a slot, clearing its stored position.
    ///
    /// Returns `None` if the slot was already empty. Ownership of the removed
    /// occupant transfers to the caller; the board retains no reference.
    pub fn remove(&mut self, position: Position) -> Result<Option<T>, ChessError> {
        let i = self.index(position)?;
        let mut occupant = self.slots[i].take();
        if let Some(occ) = occupant.as_mut() {
            occ.set_position(None);
        }
        Ok(occupant)
    }

    /// Iterate over all occupants together with their positions, row-major.
    pub fn occupants(&self) -> impl Iterator<Item = (Position, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref().map(|occ| {
                let pos = Position::new(
                    (i / self.columns as usize) as i16,
                    (i % self.columns as usize) as i16,
                );
                (pos, occ)
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
