//! One tactic per attacker slot
//!
//! Strategies are structurally immutable. Only the cursors of the contained
//! tactics move, driven by the attack actions that share them.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::battle::tactic::Tactic;
use crate::core::error::ConstructionError;
use crate::core::types::{Slot, GRID_COLS, GRID_ROWS, GRID_SLOTS};

/// Tactic shared between a strategy and the attack action driving it
pub type SharedTactic = Arc<Mutex<Tactic>>;

pub(crate) fn lock_tactic(tactic: &SharedTactic) -> MutexGuard<'_, Tactic> {
    tactic.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// How a strategy's tactics were generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    RowSweep,
    ColumnSweep,
    Concentrated,
    Custom,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::RowSweep => "row-sweep",
            StrategyKind::ColumnSweep => "column-sweep",
            StrategyKind::Concentrated => "concentrated",
            StrategyKind::Custom => "custom",
        }
    }
}

const CUSTOM_PREFIX: &str = "custom:";

#[derive(Debug)]
pub struct Strategy {
    kind: StrategyKind,
    /// Row-major, one per attacker slot
    tactics: Vec<SharedTactic>,
}

impl Strategy {
    fn generated(kind: StrategyKind, generate: impl Fn(Slot) -> Tactic) -> Self {
        Self {
            kind,
            tactics: Slot::all().map(|slot| Arc::new(Mutex::new(generate(slot)))).collect(),
        }
    }

    /// Every attacker sweeps rows front to back, starting at its own column
    pub fn row_sweep() -> Self {
        Self::generated(StrategyKind::RowSweep, |slot| Tactic::row_sweep(slot.col))
    }

    /// Every attacker sweeps columns outward from its own column
    pub fn column_sweep() -> Self {
        Self::generated(StrategyKind::ColumnSweep, |slot| Tactic::column_sweep(slot.col))
    }

    /// Every attacker follows the same natural order
    pub fn concentrated() -> Self {
        Self::generated(StrategyKind::Concentrated, |_| Tactic::concentrated())
    }

    pub fn of_kind(kind: StrategyKind) -> Option<Self> {
        match kind {
            StrategyKind::RowSweep => Some(Self::row_sweep()),
            StrategyKind::ColumnSweep => Some(Self::column_sweep()),
            StrategyKind::Concentrated => Some(Self::concentrated()),
            StrategyKind::Custom => None,
        }
    }

    /// Build from a full grid of tactics (outer: rows, inner: columns)
    pub fn custom(grid: Vec<Vec<Tactic>>) -> Result<Self, ConstructionError> {
        let mismatch = |cols: usize| ConstructionError::DimensionMismatch {
            expected_rows: GRID_ROWS,
            expected_cols: GRID_COLS,
            rows: grid.len(),
            cols,
        };
        if grid.len() != GRID_ROWS {
            return Err(mismatch(grid.first().map_or(0, Vec::len)));
        }
        if let Some(row) = grid.iter().find(|row| row.len() != GRID_COLS) {
            return Err(mismatch(row.len()));
        }
        Ok(Self {
            kind: StrategyKind::Custom,
            tactics: grid
                .into_iter()
                .flatten()
                .map(|tactic| Arc::new(Mutex::new(tactic)))
                .collect(),
        })
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Snapshot of the tactic for the attacker at (row, col)
    pub fn tactic_at(&self, row: usize, col: usize) -> Option<Tactic> {
        let tactic = self.shared_tactic(Slot::new(row, col))?;
        let snapshot = lock_tactic(&tactic).clone();
        Some(snapshot)
    }

    /// Live handle to an attacker slot's tactic
    pub fn shared_tactic(&self, slot: Slot) -> Option<SharedTactic> {
        slot.index().and_then(|i| self.tactics.get(i)).cloned()
    }

    /// Rewind every tactic to its first target
    pub fn reset_all(&self) {
        for tactic in &self.tactics {
            lock_tactic(tactic).reset();
        }
    }

    fn snapshot(&self) -> Vec<Tactic> {
        self.tactics.iter().map(|t| lock_tactic(t).clone()).collect()
    }
}

// Deep copy: the clone gets its own cursors.
impl Clone for Strategy {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            tactics: self
                .snapshot()
                .into_iter()
                .map(|tactic| Arc::new(Mutex::new(tactic)))
                .collect(),
        }
    }
}

impl PartialEq for Strategy {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.snapshot() == other.snapshot()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind != StrategyKind::Custom {
            return f.write_str(self.kind.name());
        }
        let tactics: Vec<String> = self.snapshot().iter().map(Tactic::to_string).collect();
        write!(f, "{}{}", CUSTOM_PREFIX, tactics.join(";"))
    }
}

impl FromStr for Strategy {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(body) = s.strip_prefix(CUSTOM_PREFIX) {
            let tactics = body
                .split(';')
                .map(str::parse::<Tactic>)
                .collect::<Result<Vec<_>, _>>()?;
            if tactics.len() != GRID_SLOTS {
                return Err(ConstructionError::Parse(format!(
                    "custom strategy needs {} tactics, got {}",
                    GRID_SLOTS,
                    tactics.len()
                )));
            }
            let mut rows = tactics.into_iter();
            let grid = (0..GRID_ROWS)
                .map(|_| rows.by_ref().take(GRID_COLS).collect())
                .collect();
            return Self::custom(grid);
        }
        [
            StrategyKind::RowSweep,
            StrategyKind::ColumnSweep,
            StrategyKind::Concentrated,
        ]
        .into_iter()
        .find(|kind| kind.name() == s)
        .and_then(Self::of_kind)
        .ok_or_else(|| ConstructionError::Parse(format!("unknown strategy {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_sweep_uses_slot_column() {
        let strategy = Strategy::row_sweep();
        assert_eq!(strategy.tactic_at(0, 1).unwrap(), Tactic::row_sweep(1));
        assert_eq!(strategy.tactic_at(1, 2).unwrap(), Tactic::row_sweep(2));
    }

    #[test]
    fn test_column_sweep_uses_slot_column() {
        let strategy = Strategy::column_sweep();
        assert_eq!(strategy.tactic_at(1, 0).unwrap(), Tactic::column_sweep(0));
    }

    #[test]
    fn test_tactic_at_bounds_checked() {
        let strategy = Strategy::concentrated();
        assert!(strategy.tactic_at(GRID_ROWS, 0).is_none());
        assert!(strategy.tactic_at(0, GRID_COLS).is_none());
    }

    #[test]
    fn test_custom_dimension_mismatch() {
        let short_row = vec![
            vec![Tactic::concentrated(); GRID_COLS],
            vec![Tactic::concentrated(); GRID_COLS - 1],
        ];
        assert!(matches!(
            Strategy::custom(short_row),
            Err(ConstructionError::DimensionMismatch { rows: 2, cols: 2, .. })
        ));

        let one_row = vec![vec![Tactic::concentrated(); GRID_COLS]];
        assert!(matches!(
            Strategy::custom(one_row),
            Err(ConstructionError::DimensionMismatch { rows: 1, .. })
        ));
    }

    #[test]
    fn test_reset_all_rewinds_shared_cursors() {
        let strategy = Strategy::row_sweep();
        let shared = strategy.shared_tactic(Slot::new(0, 0)).unwrap();
        lock_tactic(&shared).advance();
        lock_tactic(&shared).advance();
        assert_eq!(strategy.tactic_at(0, 0).unwrap().cursor(), 2);

        strategy.reset_all();
        assert_eq!(strategy.tactic_at(0, 0).unwrap().cursor(), 0);
    }

    #[test]
    fn test_clone_has_own_cursors() {
        let strategy = Strategy::concentrated();
        let copy = strategy.clone();
        let shared = copy.shared_tactic(Slot::new(1, 1)).unwrap();
        lock_tactic(&shared).advance();
        assert_eq!(strategy.tactic_at(1, 1).unwrap().cursor(), 0);
        assert_eq!(copy.tactic_at(1, 1).unwrap().cursor(), 1);
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(Strategy::row_sweep().to_string(), "row-sweep");
        assert_eq!("column-sweep".parse::<Strategy>().unwrap(), Strategy::column_sweep());
        assert_eq!(" concentrated ".parse::<Strategy>().unwrap(), Strategy::concentrated());
    }

    #[test]
    fn test_custom_text_round_trip() {
        let grid = vec![
            vec![Tactic::row_sweep(2), Tactic::column_sweep(0), Tactic::concentrated()],
            vec![
                Tactic::from_order(vec![5, 4, 3, 2, 1, 0]).unwrap(),
                Tactic::row_sweep(1),
                Tactic::column_sweep(2),
            ],
        ];
        let strategy = Strategy::custom(grid).unwrap();
        let text = strategy.to_string();
        assert!(text.starts_with("custom:2,1,0,5,4,3;"));
        assert_eq!(text.parse::<Strategy>().unwrap(), strategy);
    }

    #[test]
    fn test_custom_differs_from_canonical_with_same_tactics() {
        let grid = (0..GRID_ROWS)
            .map(|_| (0..GRID_COLS).map(|_| Tactic::concentrated()).collect())
            .collect();
        assert_ne!(Strategy::custom(grid).unwrap(), Strategy::concentrated());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("flanking".parse::<Strategy>(), Err(ConstructionError::Parse(_))));
        assert!(matches!("custom:0,1,2,3,4,5".parse::<Strategy>(), Err(ConstructionError::Parse(_))));
    }
}
