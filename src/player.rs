//! Per-player aggregates tracked by the simulator: living-unit count, total
//! compensation, and the player's live fighters/torpedoes in launch order.

use crate::transient::TransientObject;

/// Dense index into the simulator's per-player aggregate array. FLAK players
/// are numbered 1..=FLAK_NUM_OWNERS; a `PlayerIndex` is that number minus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerIndex(pub usize);

#[derive(Debug, Clone, Default)]
pub struct PlayerStatus {
    pub player: i32,
    pub num_live_units: i32,
    pub sum_strength: i32,
    /// Fighters and torpedoes launched by this player, most-recently-launched
    /// last. Iterated back-to-front by the combat phases so that an object
    /// deleted mid-iteration doesn't disturb the indices still to be visited.
    pub objects: Vec<TransientObject>,
    /// Once set, never cleared for the rest of the battle.
    pub has_ever_had_fighters: bool,
    pub fighter_kill_odds: i32,
}

impl PlayerStatus {
    pub fn new(player: i32, fighter_kill_odds: i32) -> Self {
        Self {
            player,
            fighter_kill_odds,
            ..Default::default()
        }
    }
}
