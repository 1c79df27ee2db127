use thiserror::Error;

use crate::core::types::SlotIndex;

/// Malformed configuration detected while building a tactic, strategy,
/// formation, encounter or battle. Always raised before anything is scheduled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Invalid tactic {order:?}: {reason}")]
    InvalidTactic { order: Vec<SlotIndex>, reason: String },

    #[error("Dimension mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    DimensionMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Formation has no combatants")]
    EmptyFormation,

    #[error("Invalid encounter: {0}")]
    InvalidEncounter(String),

    #[error("Unknown combatant: {0}")]
    UnknownCombatant(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// `current_target` was queried on a tactic with no targets left
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Tactic has no target left (cursor {cursor})")]
pub struct NoTargetError {
    pub cursor: usize,
}

#[derive(Error, Debug)]
pub enum ClashError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    NoTarget(#[from] NoTargetError),

    #[error("Battle is still running")]
    BattleInProgress,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClashError>;
