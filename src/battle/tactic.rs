//! Per-attacker targeting order
//!
//! A tactic is a permutation of every slot on the opposing grid plus a
//! cursor. The cursor only moves forward during a battle; dead or empty
//! slots are skipped lazily when the attacker next fires.

use std::fmt;
use std::str::FromStr;

use crate::core::error::{ConstructionError, NoTargetError};
use crate::core::types::{SlotIndex, GRID_COLS, GRID_ROWS, GRID_SLOTS};

#[derive(Debug, Clone, Eq)]
pub struct Tactic {
    order: Vec<SlotIndex>,
    cursor: usize,
}

// Cursor position is runtime progress and not part of a tactic's identity.
impl PartialEq for Tactic {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

/// Columns ordered closest-to-start first, alternating left then right:
/// `start, start-1, start+1, start-2, start+2, ...` clipped to the grid.
pub fn alternating_columns(start_col: usize) -> Vec<usize> {
    let start = start_col.min(GRID_COLS - 1);
    let mut cols = Vec::with_capacity(GRID_COLS);
    cols.push(start);
    for offset in 1..GRID_COLS {
        if let Some(left) = start.checked_sub(offset) {
            cols.push(left);
        }
        if start + offset < GRID_COLS {
            cols.push(start + offset);
        }
    }
    cols
}

impl Tactic {
    /// Build from an explicit order, which must be a permutation of all slots
    pub fn from_order(order: Vec<SlotIndex>) -> Result<Self, ConstructionError> {
        if order.len() != GRID_SLOTS {
            return Err(ConstructionError::InvalidTactic {
                reason: format!("expected {} slots, got {}", GRID_SLOTS, order.len()),
                order,
            });
        }
        let mut seen = [false; GRID_SLOTS];
        let mut problem = None;
        for &slot in &order {
            if slot >= GRID_SLOTS {
                problem = Some(format!("slot {slot} is off the grid"));
                break;
            }
            if seen[slot] {
                problem = Some(format!("slot {slot} appears more than once"));
                break;
            }
            seen[slot] = true;
        }
        match problem {
            Some(reason) => Err(ConstructionError::InvalidTactic { order, reason }),
            None => Ok(Self { order, cursor: 0 }),
        }
    }

    /// Front row first; within a row, columns closest to `start_col` first
    pub fn row_sweep(start_col: usize) -> Self {
        let cols = alternating_columns(start_col);
        let order = (0..GRID_ROWS)
            .flat_map(|row| cols.iter().map(move |&col| row * GRID_COLS + col))
            .collect();
        Self { order, cursor: 0 }
    }

    /// Columns closest to `start_col` first; each column swept front to back
    pub fn column_sweep(start_col: usize) -> Self {
        let order = alternating_columns(start_col)
            .into_iter()
            .flat_map(|col| (0..GRID_ROWS).map(move |row| row * GRID_COLS + col))
            .collect();
        Self { order, cursor: 0 }
    }

    /// Natural slot order, so every attacker converges on the same targets
    pub fn concentrated() -> Self {
        Self {
            order: (0..GRID_SLOTS).collect(),
            cursor: 0,
        }
    }

    pub fn order(&self) -> &[SlotIndex] {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_target(&self) -> bool {
        self.cursor < self.order.len()
    }

    pub fn current_target(&self) -> Result<SlotIndex, NoTargetError> {
        self.order
            .get(self.cursor)
            .copied()
            .ok_or(NoTargetError { cursor: self.cursor })
    }

    /// Move to the next slot; returns whether a target remains
    pub fn advance(&mut self) -> bool {
        if self.has_target() {
            self.cursor += 1;
        }
        self.has_target()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Advance past every slot `is_defeated` rejects and return the first
    /// live one, or `None` once the order is exhausted.
    pub fn next_live_target(&mut self, mut is_defeated: impl FnMut(SlotIndex) -> bool) -> Option<SlotIndex> {
        while let Ok(slot) = self.current_target() {
            if !is_defeated(slot) {
                return Some(slot);
            }
            self.advance();
        }
        None
    }
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.order.iter().map(|slot| slot.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for Tactic {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let order = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<SlotIndex>()
                    .map_err(|e| ConstructionError::Parse(format!("bad slot {part:?} in tactic: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_order(order)
    }
}
