//! A single attacker's recurring strike
//!
//! Each firing: stop if the attacker is down -> skip dead or empty target
//! slots -> report exhaustion or strike the first live target -> log.

use std::sync::Arc;

use crate::battle::encounter::Encounter;
use crate::battle::log::{LogEntry, LogSlot};
use crate::battle::strategy::{lock_tactic, SharedTactic};
use crate::combat::combatant::{Combatant, Strike};
use crate::core::config::DamageVisibility;
use crate::core::types::{Side, Slot, SlotIndex};

/// What one firing did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firing {
    /// Damage landed on the target in `slot`
    Struck { slot: SlotIndex, strike: Strike },
    /// The attacker is defeated; it must not fire again
    AttackerDefeated,
    /// The tactic ran out of live targets; the opposing formation is beaten
    Exhausted,
}

impl Firing {
    /// Whether the action should keep firing after this result
    pub fn continues(&self) -> bool {
        matches!(self, Firing::Struck { .. })
    }
}

#[derive(Debug)]
pub struct AttackAction {
    side: Side,
    slot: Slot,
    attacker: Arc<dyn Combatant>,
    tactic: SharedTactic,
    opponents: Arc<Encounter>,
    log: LogSlot,
    visibility: DamageVisibility,
}

impl AttackAction {
    pub fn new(
        side: Side,
        slot: Slot,
        attacker: Arc<dyn Combatant>,
        tactic: SharedTactic,
        opponents: Arc<Encounter>,
        log: LogSlot,
        visibility: DamageVisibility,
    ) -> Self {
        Self {
            side,
            slot,
            attacker,
            tactic,
            opponents,
            log,
            visibility,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn attacker(&self) -> &Arc<dyn Combatant> {
        &self.attacker
    }

    /// Execute one firing
    pub fn fire(&self) -> Firing {
        if self.attacker.is_defeated() {
            tracing::debug!(side = ?self.side, slot = %self.slot, "attacker defeated, stopping");
            return Firing::AttackerDefeated;
        }

        let formation = self.opponents.formation();
        let target_slot = {
            let mut tactic = lock_tactic(&self.tactic);
            tactic.next_live_target(|index| formation.is_index_defeated(index))
        };
        let Some(target_slot) = target_slot else {
            tracing::debug!(side = ?self.side, slot = %self.slot, "no live targets left");
            return Firing::Exhausted;
        };
        // Skipping already proved the slot is occupied.
        let Some(target) = formation.occupant(target_slot) else {
            return Firing::Exhausted;
        };

        let stat = target.preferred_damage_stat();
        let strike = target.apply_damage(self.attacker.attack_power(), stat);
        tracing::debug!(
            side = ?self.side,
            attacker = self.attacker.display_name(),
            target = target.display_name(),
            ?stat,
            dealt = strike.dealt,
            "strike"
        );

        let damage = match self.visibility {
            DamageVisibility::Shown => Some(strike.dealt),
            DamageVisibility::Hidden => None,
        };
        self.log.record(LogEntry::hit(
            self.side,
            self.attacker.display_name(),
            self.attacker.attack_verb(),
            target.display_name(),
            damage,
        ));
        if strike.defeated {
            self.log.record(LogEntry::defeated(
                self.side,
                self.attacker.display_name(),
                target.display_name(),
            ));
        }

        Firing::Struck {
            slot: target_slot,
            strike,
        }
    }
}
