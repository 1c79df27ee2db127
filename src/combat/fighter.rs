//! Reference combatant
//!
//! Fixed stats plus mutable vitals. Vitals sit behind a lock owned by the
//! fighter, so concurrent hits on one fighter serialize while hits on
//! different fighters never contend.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::combat::combatant::{Combatant, StatKind, Strike};
use crate::combat::constants::{DEFAULT_HEALTH, DEFAULT_POWER, DEFAULT_SPEED, DEFAULT_WARD};
use crate::core::config::BattleConfig;

/// Static description of a fighter, as read from a roster file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    pub key: String,
    pub name: String,
    #[serde(default = "default_health")]
    pub health: i64,
    #[serde(default)]
    pub ward: i64,
    #[serde(default = "default_power")]
    pub power: i64,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub verb: Option<String>,
}

fn default_health() -> i64 {
    DEFAULT_HEALTH
}

fn default_power() -> i64 {
    DEFAULT_POWER
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

impl FighterStats {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            health: DEFAULT_HEALTH,
            ward: DEFAULT_WARD,
            power: DEFAULT_POWER,
            speed: DEFAULT_SPEED,
            verb: None,
        }
    }

    pub fn with_health(mut self, health: i64) -> Self {
        self.health = health;
        self
    }

    pub fn with_ward(mut self, ward: i64) -> Self {
        self.ward = ward;
        self
    }

    pub fn with_power(mut self, power: i64) -> Self {
        self.power = power;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(verb.into());
        self
    }
}

/// Current health and ward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub health: i64,
    pub ward: i64,
}

#[derive(Debug)]
pub struct Fighter {
    stats: FighterStats,
    vitals: Mutex<Vitals>,
}

impl Fighter {
    pub fn new(stats: FighterStats) -> Self {
        let vitals = Vitals {
            health: stats.health.max(0),
            ward: stats.ward.max(0),
        };
        Self {
            stats,
            vitals: Mutex::new(vitals),
        }
    }

    pub fn shared(stats: FighterStats) -> Arc<dyn Combatant> {
        Arc::new(Self::new(stats))
    }

    pub fn stats(&self) -> &FighterStats {
        &self.stats
    }

    /// Snapshot of current vitals
    pub fn vitals(&self) -> Vitals {
        *self.lock_vitals()
    }

    // Vitals are plain numbers, so a poisoned lock still holds usable data.
    fn lock_vitals(&self) -> MutexGuard<'_, Vitals> {
        self.vitals.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Combatant for Fighter {
    fn key(&self) -> &str {
        &self.stats.key
    }

    fn display_name(&self) -> &str {
        &self.stats.name
    }

    fn is_defeated(&self) -> bool {
        self.lock_vitals().health <= 0
    }

    fn attack_power(&self) -> i64 {
        self.stats.power.max(0)
    }

    fn attack_interval(&self, config: &BattleConfig) -> Duration {
        config.attack_interval_for_speed(self.stats.speed)
    }

    fn preferred_damage_stat(&self) -> StatKind {
        if self.lock_vitals().ward > 0 {
            StatKind::Ward
        } else {
            StatKind::Health
        }
    }

    fn apply_damage(&self, amount: i64, stat: StatKind) -> Strike {
        let amount = amount.max(0);
        let mut vitals = self.lock_vitals();
        let was_alive = vitals.health > 0;
        // Ward soaks first; whatever it cannot absorb spills into health.
        let absorbed = match stat {
            StatKind::Ward => amount.min(vitals.ward),
            StatKind::Health => 0,
        };
        vitals.ward -= absorbed;
        let wounded = (amount - absorbed).min(vitals.health.max(0));
        vitals.health -= wounded;
        Strike {
            dealt: absorbed + wounded,
            defeated: was_alive && vitals.health <= 0,
        }
    }

    fn restore(&self) {
        let mut vitals = self.lock_vitals();
        vitals.health = self.stats.health.max(0);
        vitals.ward = self.stats.ward.max(0);
    }

    fn duplicate(&self) -> Arc<dyn Combatant> {
        Arc::new(Fighter {
            stats: self.stats.clone(),
            vitals: Mutex::new(self.vitals()),
        })
    }

    fn attack_verb(&self) -> &str {
        self.stats.verb.as_deref().unwrap_or("attacks")
    }
}
