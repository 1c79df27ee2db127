//! Combatant repository
//!
//! Resolves combatant keys to shared combatants. Passed explicitly to the
//! text parsers instead of living in a global registry.

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::combat::constants::{
    RANDOM_HEALTH_RANGE, RANDOM_POWER_RANGE, RANDOM_SPEED_RANGE, RANDOM_WARD_RANGE,
};
use crate::combat::fighter::{Fighter, FighterStats};
use crate::core::error::{ConstructionError, Result};

/// Marker for an empty formation cell in text encodings
pub const EMPTY_CELL: &str = "-";

/// On-disk roster layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterFile {
    #[serde(default)]
    pub fighter: Vec<FighterStats>,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    combatants: AHashMap<String, Arc<dyn Combatant>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a combatant under its key
    ///
    /// Keys must be unique and usable inside formation text, so they may not
    /// be empty, equal the empty-cell marker, or contain separators.
    pub fn insert(&mut self, combatant: Arc<dyn Combatant>) -> std::result::Result<(), ConstructionError> {
        let key = combatant.key().to_string();
        if key.is_empty()
            || key == EMPTY_CELL
            || key.contains(|c: char| c == ',' || c == '/' || c.is_whitespace())
        {
            return Err(ConstructionError::Parse(format!(
                "combatant key {key:?} cannot be used in formation text"
            )));
        }
        if self.combatants.contains_key(&key) {
            return Err(ConstructionError::Parse(format!("duplicate combatant key {key:?}")));
        }
        self.combatants.insert(key, combatant);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn Combatant>> {
        self.combatants.get(key).cloned()
    }

    /// Look up a key, failing with `UnknownCombatant`
    pub fn resolve(&self, key: &str) -> std::result::Result<Arc<dyn Combatant>, ConstructionError> {
        self.get(key)
            .ok_or_else(|| ConstructionError::UnknownCombatant(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.combatants.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn from_stats(stats: impl IntoIterator<Item = FighterStats>) -> Result<Self> {
        let mut roster = Self::new();
        for entry in stats {
            roster.insert(Fighter::shared(entry))?;
        }
        Ok(roster)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RosterFile = toml::from_str(content)?;
        Self::from_stats(file.fighter)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Seeded random fighters keyed `{prefix}1..={prefix}{count}`
    pub fn random(prefix: &str, count: usize, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stats: Vec<FighterStats> = (1..=count)
            .map(|n| {
                FighterStats::new(format!("{prefix}{n}"), format!("{prefix}{n}"))
                    .with_health(rng.gen_range(RANDOM_HEALTH_RANGE.0..=RANDOM_HEALTH_RANGE.1))
                    .with_ward(rng.gen_range(RANDOM_WARD_RANGE.0..=RANDOM_WARD_RANGE.1))
                    .with_power(rng.gen_range(RANDOM_POWER_RANGE.0..=RANDOM_POWER_RANGE.1))
                    .with_speed(rng.gen_range(RANDOM_SPEED_RANGE.0..RANDOM_SPEED_RANGE.1))
            })
            .collect();
        Self::from_stats(stats)
    }

    /// Merge another roster into this one
    pub fn extend(&mut self, other: Roster) -> std::result::Result<(), ConstructionError> {
        for (_, combatant) in other.combatants {
            self.insert(combatant)?;
        }
        Ok(())
    }
}
