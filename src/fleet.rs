//! A fleet is a contiguous group of a single player's units that moves
//! together and shares a common enemy.

use serde::{Deserialize, Serialize};

use crate::unit::UnitIndex;

/// Dense index into the simulator's fleet array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FleetIndex(pub usize);

/// One edge of a fleet's attack list: a unit it may attack, plus a rating
/// bonus that biases target selection toward (or away from) it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct AttackListEntry {
    pub target: UnitIndex,
    pub rating_bonus: i16,
}

/// Immutable for the whole battle.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct FleetData {
    pub player: i32,
    pub speed: i32,
    pub initial_x: i32,
    pub initial_y: i32,
    pub first_ship_index: usize,
    pub num_ships: usize,
    pub attack_list: Vec<AttackListEntry>,
}

impl FleetData {
    pub fn ship_range(&self) -> std::ops::Range<usize> {
        self.first_ship_index..self.first_ship_index + self.num_ships
    }
}

/// Mutable per-tick state of a fleet.
#[derive(Debug, Clone)]
pub struct FleetStatus {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub enemy: Option<UnitIndex>,
    pub alive: bool,
    /// Scratch position computed during the movement phase and applied to
    /// all fleets simultaneously at the end of the phase.
    pub new_position: (i32, i32),
}

impl FleetStatus {
    pub fn new(data: &FleetData) -> Self {
        Self {
            x: data.initial_x,
            y: data.initial_y,
            z: 0,
            enemy: None,
            alive: true,
            new_position: (data.initial_x, data.initial_y),
        }
    }
}
