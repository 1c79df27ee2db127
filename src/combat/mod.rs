pub mod combatant;
pub mod constants;
pub mod fighter;
pub mod roster;

pub use combatant::{Combatant, StatKind, Strike};
pub use fighter::{Fighter, FighterStats, Vitals};
pub use roster::{Roster, RosterFile, EMPTY_CELL};
