//! Battle system - formation-vs-formation fights on independent timers
//!
//! Who attacks whom comes from the data model: a `Formation` of combatants,
//! a `Strategy` holding one `Tactic` per attacker slot, paired as an
//! `Encounter`. A `Battle` schedules one `AttackAction` per living attacker
//! and concludes the moment any attacker runs out of targets.

pub mod action;
pub mod encounter;
pub mod execution;
pub mod formation;
pub mod log;
pub mod strategy;
pub mod tactic;

// Re-exports for convenient access
pub use action::{AttackAction, Firing};
pub use encounter::Encounter;
pub use execution::{Battle, BattleOutcome, BattlePhase};
pub use formation::{Cell, Formation};
pub use log::{BattleLog, LogEntry, LogEntryKind, LogSlot, MemoryLog, TracingLog};
pub use strategy::{SharedTactic, Strategy, StrategyKind};
pub use tactic::{alternating_columns, Tactic};
