//! Manifest constants for the FLAK game rules.

pub const FLAK_MAX_BEAMS: usize = 20;
pub const FLAK_MAX_TORPS: usize = 20;
pub const FLAK_MAX_BAYS: usize = 50;
pub const FLAK_NUM_OWNERS: i32 = 12;

/// Interval between choosing enemies.
pub const FLAK_CHOOSE_ENEMY_TIME: i32 = 30;

/// Targeting.
pub const FLAK_DIFF_OFFSET: i32 = 100;
pub const FLAK_DIVISOR_IF_SMALLER: i32 = 100;
pub const FLAK_DIVISOR_IF_BIGGER: i32 = 250;
pub const FLAK_DIVISOR_SAME_ENEMY_BONUS: i32 = 150;
pub const FLAK_MULTIPLIER_MIN: i32 = 50;

/// Torpedo firepower limitation.
pub const FLAK_TORP_LIMIT_FACTOR: i32 = 120;

/// Compensation.
pub const FLAK_COMPENSATION_LIMIT: i32 = 2;
pub const FLAK_COMPENSATION_DIVISOR: i32 = 1000;

/// Combat.
pub const FLAK_TORP_MOVEMENT_SPEED: i32 = 1000;
pub const FLAK_FIGHTER_INTERCEPT_RANGE: i32 = 128;

/// MaxFightersLaunched.
pub const FLAK_MFL_SCALE: i32 = 2;
pub const FLAK_MAXIMUM_MFL: i32 = 50;
pub const FLAK_MINIMUM_MFL: i32 = 1;

/// Race numbers with special-cased rules.
pub const FLAK_RACE_LIZARD: i32 = 2;
pub const FLAK_RACE_PRIVATEER: i32 = 5;

/// Damage survival limit for regular races; `FLAK_RACE_LIZARD` gets 150 instead.
pub const FLAK_DAMAGE_SURVIVAL_LIMIT: f64 = 99.0;
pub const FLAK_DAMAGE_SURVIVAL_LIMIT_LIZARD: f64 = 150.0;
