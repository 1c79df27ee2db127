//! Battle configuration
//!
//! Pacing and presentation knobs the battle core consults. Everything else
//! about a combatant (stats, balance) lives with the combatant itself.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{ClashError, Result};

/// Whether numeric damage appears in battle log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageVisibility {
    #[default]
    Shown,
    Hidden,
}

/// Configuration for a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Difficulty setting: harder modes hide the damage numbers
    pub damage_visibility: DamageVisibility,

    /// Floor for any attacker's attack interval (milliseconds)
    ///
    /// Must be strictly positive. A zero period would make an attacker
    /// fire continuously and starve the runtime.
    pub min_attack_interval_ms: u64,

    /// Attack interval of a speed-1 combatant (milliseconds)
    ///
    /// A combatant with speed `s` attacks every `base / s` ms, clamped to
    /// `min_attack_interval_ms`.
    pub base_attack_interval_ms: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            damage_visibility: DamageVisibility::Shown,
            min_attack_interval_ms: 10,
            base_attack_interval_ms: 1000,
        }
    }
}

impl BattleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_attack_interval(&self) -> Duration {
        Duration::from_millis(self.min_attack_interval_ms)
    }

    /// Attack interval for a combatant of the given speed
    pub fn attack_interval_for_speed(&self, speed: f32) -> Duration {
        let floor = self.min_attack_interval_ms.max(1);
        if speed.is_nan() || speed <= 0.0 {
            return Duration::from_millis(self.base_attack_interval_ms.max(floor));
        }
        let millis = (self.base_attack_interval_ms as f32 / speed).round() as u64;
        Duration::from_millis(millis.max(floor))
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_attack_interval_ms == 0 {
            return Err(ClashError::Config(
                "min_attack_interval_ms must be positive".into(),
            ));
        }
        if self.base_attack_interval_ms < self.min_attack_interval_ms {
            return Err(ClashError::Config(format!(
                "base_attack_interval_ms ({}) should be >= min_attack_interval_ms ({})",
                self.base_attack_interval_ms, self.min_attack_interval_ms
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document; missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
