pub mod config;
pub mod error;
pub mod types;

pub use config::{BattleConfig, DamageVisibility};
pub use error::{ClashError, ConstructionError, NoTargetError, Result};
pub use types::{Side, Slot, SlotIndex, GRID_COLS, GRID_ROWS, GRID_SLOTS};
