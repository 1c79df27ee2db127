//! A formation paired with the strategy it fights with

use std::sync::Arc;

use crate::battle::formation::Formation;
use crate::battle::strategy::Strategy;
use crate::battle::tactic::Tactic;
use crate::combat::combatant::Combatant;

/// The unit one side fields in a battle.
///
/// Cloning deep-copies both the formation's occupants and the strategy's
/// cursors, so a battle fought with the clone leaves the template untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    formation: Formation,
    strategy: Strategy,
}

impl Encounter {
    pub fn new(formation: Formation, strategy: Strategy) -> Self {
        Self { formation, strategy }
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn combatant_at(&self, row: usize, col: usize) -> Option<Arc<dyn Combatant>> {
        self.formation.combatant_at(row, col)
    }

    pub fn tactic_at(&self, row: usize, col: usize) -> Option<Tactic> {
        self.strategy.tactic_at(row, col)
    }

    pub fn is_defeated(&self) -> bool {
        self.formation.is_defeated()
    }

    pub fn size(&self) -> usize {
        self.formation.size()
    }

    /// Heal every occupant and rewind every tactic
    pub fn restore(&self) {
        self.formation.restore_all();
        self.strategy.reset_all();
    }
}
