//! The combatant interface the battle core consumes
//!
//! Stat derivation and balance live behind this trait. The battle only
//! reads liveness, power and pacing, and mutates through `apply_damage`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::config::BattleConfig;

/// Stat a hit is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// Protective pool absorbed before health
    Ward,
    Health,
}

/// Result of one `apply_damage` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strike {
    /// Damage actually removed from the stat
    pub dealt: i64,
    /// This hit moved the combatant from alive to defeated
    pub defeated: bool,
}

/// A fighter that can be placed in a formation
///
/// Implementations must make `apply_damage` safe to call from several
/// attackers at once, guarding each combatant with its own lock.
pub trait Combatant: Send + Sync + fmt::Debug {
    /// Stable key used by text encodings and rosters
    fn key(&self) -> &str;

    fn display_name(&self) -> &str;

    fn is_defeated(&self) -> bool;

    /// Damage dealt per hit (never negative)
    fn attack_power(&self) -> i64;

    /// Period between this combatant's attacks; always strictly positive
    fn attack_interval(&self, config: &BattleConfig) -> Duration;

    /// Stat the next hit should land on
    fn preferred_damage_stat(&self) -> StatKind;

    /// Remove `amount` starting at `stat`, atomically per combatant.
    /// Damage a ward cannot absorb carries into health under the same
    /// lock, so the total dealt does not depend on hit order.
    fn apply_damage(&self, amount: i64, stat: StatKind) -> Strike;

    /// Heal back to full
    fn restore(&self);

    /// Independent copy with its own state, for per-engagement clones
    fn duplicate(&self) -> Arc<dyn Combatant>;

    /// Verb used in log entries ("slashes", "bites", ...)
    fn attack_verb(&self) -> &str {
        "attacks"
    }
}
