//! Snapshot/restore, battle termination, and the host-side capture cascade
//! that turns a destroyed unit into either wreckage or a captured prize.
//! `find_captor`/`find_ending_status` are explicitly *not* part of the
//! deterministic tick sequence: they consume an outside [`CaptorRng`], not the
//! simulator's own `Lcg`.

use super::Algorithm;
use crate::definitions::*;
use crate::environment::Environment;
use crate::fleet::FleetStatus;
use crate::player::PlayerStatus;
use crate::rng::CaptorRng;
use crate::transient::VisId;
use crate::unit::{UnitIndex, UnitStatus};

/// Opaque snapshot of everything that changes tick-to-tick. Restorable only
/// to the `Algorithm` it was taken from — `player_index` and the immutable
/// Data arrays never change after construction, so they aren't part of it.
#[derive(Debug, Clone)]
pub struct StatusToken {
    fleet_status: Vec<FleetStatus>,
    unit_status: Vec<UnitStatus>,
    players: Vec<PlayerStatus>,
    seed: u32,
    time: i32,
    terminated: bool,
    free_object_ids: Vec<VisId>,
    next_object_id: usize,
}

impl Algorithm {
    /// Captures the current tick's full mutable state.
    pub fn create_status_token(&self) -> StatusToken {
        StatusToken {
            fleet_status: self.fleet_status.clone(),
            unit_status: self.unit_status.clone(),
            players: self.players.clone(),
            seed: self.rng.seed(),
            time: self.time,
            terminated: self.terminated,
            free_object_ids: self.free_object_ids.clone(),
            next_object_id: self.next_object_id,
        }
    }

    /// Rewinds to a previously captured tick. `token` must have been created
    /// by this same `Algorithm` instance (same fleet/unit/player array shape).
    pub fn apply_status_token(&mut self, token: &StatusToken) {
        self.fleet_status = token.fleet_status.clone();
        self.unit_status = token.unit_status.clone();
        self.players = token.players.clone();
        self.rng.set_seed(token.seed);
        self.time = token.time;
        self.terminated = token.terminated;
        self.free_object_ids = token.free_object_ids.clone();
        self.next_object_id = token.next_object_id;
    }

    /// True once every player's object list is empty and no living fleet
    /// still has an enemy assigned.
    pub(super) fn end_check(&self) -> bool {
        for &p in &self.player_index {
            if !self.players[p].objects.is_empty() {
                return false;
            }
        }
        for status in &self.fleet_status {
            if status.alive && status.enemy.is_some() {
                return false;
            }
        }
        true
    }

    /// Finds who should capture `ship` after the battle, given an outside RNG
    /// for host-side adjudication. Call once per captured ship — called
    /// again it may return a different unit, since the RNG advances.
    ///
    /// Cascade: the last unit to hit it, if still alive; else a random living
    /// unit of that unit's player; else a random living unit of the victim's
    /// own player; else any random living unit; else nobody.
    pub fn find_captor(&self, ship: UnitIndex, rng: &mut dyn CaptorRng) -> Option<UnitIndex> {
        let last_hit_by = self.unit_status[ship.0].last_hit_by?;
        if self.unit_status[last_hit_by.0].alive {
            return Some(last_hit_by);
        }

        let mut counts = [0i32; (FLAK_NUM_OWNERS + 1) as usize];
        let mut total = 0;
        for i in 0..self.units.len() {
            if self.unit_status[i].alive {
                counts[self.units[i].owner as usize] += 1;
                total += 1;
            }
        }

        let captor_player = self.units[last_hit_by.0].owner;
        if counts[captor_player as usize] > 0 {
            if let Some(u) = self.pick_alive_of_player(captor_player, counts[captor_player as usize], rng) {
                return Some(u);
            }
        }

        let owner_player = self.units[ship.0].owner;
        if counts[owner_player as usize] > 0 {
            if let Some(u) = self.pick_alive_of_player(owner_player, counts[owner_player as usize], rng) {
                return Some(u);
            }
        }

        if total > 0 {
            let mut pick = rng.pick(total as usize) as i64;
            for i in 0..self.units.len() {
                if self.unit_status[i].alive {
                    if pick == 0 {
                        return Some(UnitIndex(i));
                    }
                    pick -= 1;
                }
            }
        }

        None
    }

    fn pick_alive_of_player(&self, player: i32, count: i32, rng: &mut dyn CaptorRng) -> Option<UnitIndex> {
        let mut pick = rng.pick(count as usize) as i64;
        for i in 0..self.units.len() {
            if self.unit_status[i].alive && self.units[i].owner == player {
                if pick == 0 {
                    return Some(UnitIndex(i));
                }
                pick -= 1;
            }
        }
        None
    }

    /// Ending status for one unit: `0` survived, `-1` destroyed, otherwise the
    /// capturing player's number. Intended for simulation output, where the
    /// captor's identity (needed for experience production) is not retained.
    pub fn find_ending_status(&self, ship: UnitIndex, env: &dyn Environment, rng: &mut dyn CaptorRng) -> i32 {
        if self.unit_status[ship.0].alive {
            return 0;
        }
        match self.find_captor(ship, rng) {
            Some(captor) => {
                let captor_player = self.units[captor.0].owner;
                let victim_player = self.units[ship.0].owner;
                let limit = if env.get_player_race_number(victim_player) == FLAK_RACE_LIZARD && env.get_player_race_number(captor_player) == FLAK_RACE_LIZARD {
                    FLAK_DAMAGE_SURVIVAL_LIMIT_LIZARD
                } else {
                    FLAK_DAMAGE_SURVIVAL_LIMIT
                };
                let damage_rounded = super::round_half_up(self.unit_status[ship.0].damage) as f64;
                if self.units[ship.0].is_planet || (self.unit_status[ship.0].crew < 0.5 && damage_rounded <= limit) {
                    captor_player
                } else {
                    -1
                }
            }
            None => -1,
        }
    }

    /// Populates `find_ending_status` for every unit in this battle.
    pub fn set_ending_status(&self, env: &dyn Environment, rng: &mut dyn CaptorRng) -> Vec<i32> {
        (0..self.units.len()).map(|i| self.find_ending_status(UnitIndex(i), env, rng)).collect()
    }
}
