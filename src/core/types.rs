//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Rows in every formation grid (row 0 is the front row)
pub const GRID_ROWS: usize = 2;

/// Columns in every formation grid
pub const GRID_COLS: usize = 3;

/// Number of slots in a formation grid
pub const GRID_SLOTS: usize = GRID_ROWS * GRID_COLS;

/// Row-major slot index into a formation grid (`row * GRID_COLS + col`)
pub type SlotIndex = usize;

/// One (row, col) position in a formation grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
}

impl Slot {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Slot for a row-major index, if the index is on the grid
    pub fn from_index(index: SlotIndex) -> Option<Self> {
        (index < GRID_SLOTS).then(|| Self::new(index / GRID_COLS, index % GRID_COLS))
    }

    /// Row-major index, if the slot is on the grid
    pub fn index(&self) -> Option<SlotIndex> {
        self.in_bounds().then(|| self.row * GRID_COLS + self.col)
    }

    pub fn in_bounds(&self) -> bool {
        self.row < GRID_ROWS && self.col < GRID_COLS
    }

    /// Every slot on the grid in row-major order
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..GRID_SLOTS).map(|i| Slot::new(i / GRID_COLS, i % GRID_COLS))
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Which lineup a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Party1,
    Party2,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Party1 => Side::Party2,
            Side::Party2 => Side::Party1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_index_round_trip() {
        for index in 0..GRID_SLOTS {
            let slot = Slot::from_index(index).unwrap();
            assert_eq!(slot.index(), Some(index));
        }
    }

    #[test]
    fn test_slot_out_of_bounds() {
        assert!(Slot::from_index(GRID_SLOTS).is_none());
        assert_eq!(Slot::new(GRID_ROWS, 0).index(), None);
        assert_eq!(Slot::new(0, GRID_COLS).index(), None);
    }

    #[test]
    fn test_slot_all_is_row_major() {
        let slots: Vec<Slot> = Slot::all().collect();
        assert_eq!(slots.len(), GRID_SLOTS);
        assert_eq!(slots[0], Slot::new(0, 0));
        assert_eq!(slots[GRID_COLS], Slot::new(1, 0));
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Party1.opponent(), Side::Party2);
        assert_eq!(Side::Party2.opponent(), Side::Party1);
    }
}
