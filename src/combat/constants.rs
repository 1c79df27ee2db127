//! Combat system constants - all tunable values in one place

// Reference fighter defaults
pub const DEFAULT_HEALTH: i64 = 100;
pub const DEFAULT_WARD: i64 = 0;
pub const DEFAULT_POWER: i64 = 10;
pub const DEFAULT_SPEED: f32 = 1.0;

// Random roster generation (battle runner)
pub const RANDOM_HEALTH_RANGE: (i64, i64) = (40, 120);
pub const RANDOM_WARD_RANGE: (i64, i64) = (0, 30);
pub const RANDOM_POWER_RANGE: (i64, i64) = (5, 20);
pub const RANDOM_SPEED_RANGE: (f32, f32) = (0.5, 2.5);
