//! Fixed 2x3 grid of combatants fielded by one side

use std::fmt;
use std::sync::Arc;

use crate::combat::combatant::Combatant;
use crate::combat::roster::{Roster, EMPTY_CELL};
use crate::core::error::ConstructionError;
use crate::core::types::{Slot, SlotIndex, GRID_COLS, GRID_ROWS, GRID_SLOTS};

pub type Cell = Option<Arc<dyn Combatant>>;

const ROW_SEPARATOR: &str = "/";
const CELL_SEPARATOR: &str = ",";

/// Grid of optional occupants. The occupants never change after
/// construction; only their own vitals do.
#[derive(Debug)]
pub struct Formation {
    /// Row-major
    cells: Vec<Cell>,
}

impl Formation {
    /// Build from rows of cells; the grid must be 2x3 with at least one occupant
    pub fn new(grid: Vec<Vec<Cell>>) -> Result<Self, ConstructionError> {
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
        let cells: Vec<Cell> = grid.into_iter().flatten().collect();
        if cells.iter().all(Option::is_none) {
            return Err(ConstructionError::EmptyFormation);
        }
        Ok(Self { cells })
    }

    /// Place combatants at explicit slots, leaving the rest empty
    pub fn from_placements(
        placements: impl IntoIterator<Item = (Slot, Arc<dyn Combatant>)>,
    ) -> Result<Self, ConstructionError> {
        let mut grid: Vec<Vec<Cell>> = vec![vec![None; GRID_COLS]; GRID_ROWS];
        for (slot, combatant) in placements {
            if !slot.in_bounds() {
                return Err(ConstructionError::DimensionMismatch {
                    expected_rows: GRID_ROWS,
                    expected_cols: GRID_COLS,
                    rows: slot.row + 1,
                    cols: slot.col + 1,
                });
            }
            grid[slot.row][slot.col] = Some(combatant);
        }
        Self::new(grid)
    }

    pub fn combatant_at(&self, row: usize, col: usize) -> Option<Arc<dyn Combatant>> {
        Slot::new(row, col).index().and_then(|i| self.occupant(i)).cloned()
    }

    pub(crate) fn occupant(&self, index: SlotIndex) -> Option<&Arc<dyn Combatant>> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// True if the slot is empty (or off the grid) or its occupant is defeated
    pub fn is_slot_defeated(&self, row: usize, col: usize) -> bool {
        Slot::new(row, col)
            .index()
            .map_or(true, |index| self.is_index_defeated(index))
    }

    pub fn is_index_defeated(&self, index: SlotIndex) -> bool {
        self.occupant(index).map_or(true, |c| c.is_defeated())
    }

    /// True iff every occupied slot is defeated
    pub fn is_defeated(&self) -> bool {
        (0..GRID_SLOTS).all(|index| self.is_index_defeated(index))
    }

    pub fn restore_all(&self) {
        for (_, combatant) in self.occupants() {
            combatant.restore();
        }
    }

    /// Number of occupied slots
    pub fn size(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Occupied slots in row-major order
    pub fn occupants(&self) -> impl Iterator<Item = (Slot, &Arc<dyn Combatant>)> {
        Slot::all()
            .zip(self.cells.iter())
            .filter_map(|(slot, cell)| cell.as_ref().map(|c| (slot, c)))
    }

    /// Parse `a,-,b/-,c,-` style text, resolving keys through `roster`.
    /// Combatants are shared with the roster, not copied.
    pub fn parse(text: &str, roster: &Roster) -> Result<Self, ConstructionError> {
        let grid = text
            .trim()
            .split(ROW_SEPARATOR)
            .map(|row| {
                row.split(CELL_SEPARATOR)
                    .map(|cell| match cell.trim() {
                        "" => Err(ConstructionError::Parse(format!("blank cell in {text:?}"))),
                        EMPTY_CELL => Ok(None),
                        key => roster.resolve(key).map(Some),
                    })
                    .collect::<Result<Vec<Cell>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(grid)
    }

    fn cell_keys(&self) -> impl Iterator<Item = Option<&str>> {
        self.cells.iter().map(|cell| cell.as_ref().map(|c| c.key()))
    }
}

// Deep copy: every occupant is duplicated so damage to the copy stays there.
impl Clone for Formation {
    fn clone(&self) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|cell| cell.as_ref().map(|c| c.duplicate()))
                .collect(),
        }
    }
}

/// Formations are equal when the same keys occupy the same slots
impl PartialEq for Formation {
    fn eq(&self, other: &Self) -> bool {
        self.cell_keys().eq(other.cell_keys())
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .cells
            .chunks(GRID_COLS)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map_or(EMPTY_CELL, |c| c.key()))
                    .collect::<Vec<_>>()
                    .join(CELL_SEPARATOR)
            })
            .collect();
        write!(f, "{}", rows.join(ROW_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Fighter, FighterStats, StatKind};

    fn roster() -> Roster {
        Roster::from_stats([
            FighterStats::new("orc", "Orc").with_health(10),
            FighterStats::new("elf", "Elf").with_health(8),
            FighterStats::new("imp", "Imp").with_health(3),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_shape() {
        let grid = vec![vec![None, None, None]];
        assert!(matches!(
            Formation::new(grid),
            Err(ConstructionError::DimensionMismatch { rows: 1, cols: 3, .. })
        ));
    }

    #[test]
    fn test_new_rejects_empty() {
        let grid = vec![vec![None, None, None], vec![None, None, None]];
        assert_eq!(Formation::new(grid).unwrap_err(), ConstructionError::EmptyFormation);
    }

    #[test]
    fn test_from_placements_rejects_off_grid() {
        let orc = Fighter::shared(FighterStats::new("orc", "Orc"));
        assert!(Formation::from_placements([(Slot::new(2, 0), orc)]).is_err());
    }

    #[test]
    fn test_lookup_and_size() {
        let formation = Formation::parse("orc,-,elf/-,imp,-", &roster()).unwrap();
        assert_eq!(formation.size(), 3);
        assert_eq!(formation.combatant_at(0, 2).unwrap().key(), "elf");
        assert!(formation.combatant_at(0, 1).is_none());
        assert!(formation.combatant_at(5, 5).is_none());
    }

    #[test]
    fn test_slot_and_formation_defeat() {
        let formation = Formation::parse("orc,-,-/-,imp,-", &roster()).unwrap();
        assert!(formation.is_slot_defeated(0, 1));
        assert!(!formation.is_slot_defeated(0, 0));
        assert!(formation.is_slot_defeated(9, 9));

        let imp = formation.combatant_at(1, 1).unwrap();
        imp.apply_damage(3, StatKind::Health);
        assert!(formation.is_slot_defeated(1, 1));
        assert!(!formation.is_defeated());

        let orc = formation.combatant_at(0, 0).unwrap();
        orc.apply_damage(10, StatKind::Health);
        assert!(formation.is_defeated());

        formation.restore_all();
        assert!(!formation.is_slot_defeated(0, 0));
        assert!(!formation.is_slot_defeated(1, 1));
    }

    #[test]
    fn test_clone_is_deep() {
        let formation = Formation::parse("orc,-,-/-,-,-", &roster()).unwrap();
        let copy = formation.clone();
        copy.combatant_at(0, 0).unwrap().apply_damage(100, StatKind::Health);
        assert!(copy.is_defeated());
        assert!(!formation.is_defeated());
        assert_eq!(copy, formation);
    }

    #[test]
    fn test_text_round_trip() {
        let roster = roster();
        let formation = Formation::parse(" orc , -,elf/-,imp,- ", &roster).unwrap();
        assert_eq!(formation.to_string(), "orc,-,elf/-,imp,-");
        assert_eq!(Formation::parse(&formation.to_string(), &roster).unwrap(), formation);
    }

    #[test]
    fn test_parse_errors() {
        let roster = roster();
        assert_eq!(
            Formation::parse("orc,-,troll/-,-,-", &roster).unwrap_err(),
            ConstructionError::UnknownCombatant("troll".into())
        );
        assert!(matches!(
            Formation::parse("orc,,-/-,-,-", &roster),
            Err(ConstructionError::Parse(_))
        ));
        assert!(matches!(
            Formation::parse("orc,-,-", &roster),
            Err(ConstructionError::DimensionMismatch { .. })
        ));
        assert_eq!(
            Formation::parse("-,-,-/-,-,-", &roster).unwrap_err(),
            ConstructionError::EmptyFormation
        );
    }
}
