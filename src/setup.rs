//! Immutable battle input: fleets, units, attack-list edges, seed, position,
//! total-time hint. Owns the pre-simulation transforms that establish the
//! invariants the simulator core relies on.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::configuration::Configuration;
use crate::definitions::FLAK_NUM_OWNERS;
use crate::environment::{ArrayOption, Environment};
use crate::error::{FlakError, Result};
use crate::fleet::{AttackListEntry, FleetData, FleetIndex};
use crate::rng::Lcg;
use crate::unit::{UnitData, UnitIndex};

/// Battle setup: stores the initial status of a FLAK fight.
///
/// Unlike the simulator core, getters on out-of-range indices here panic
/// (via `debug_assert`-free bounds checks raised as [`FlakError`]) rather
/// than returning defaults, since an out-of-range index at setup time is
/// always a builder bug, not an end-of-battle UI redraw.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    fleets: Vec<FleetData>,
    units: Vec<UnitData>,
    total_time: i32,
    seed: u32,
    position: Option<(i32, i32)>,
    ambient_flags: i32,
}

impl Setup {
    pub fn new() -> Self {
        Self::default()
    }

    /*
     *  Fleets and attack lists
     */

    /// Adds an empty fleet for the given player. Ships are then attached
    /// with [`Setup::add_ship`].
    pub fn add_fleet(&mut self, player: i32) -> FleetIndex {
        let index = self.fleets.len();
        self.fleets.push(FleetData {
            player,
            first_ship_index: self.units.len(),
            ..Default::default()
        });
        FleetIndex(index)
    }

    pub fn num_fleets(&self) -> usize {
        self.fleets.len()
    }

    pub fn fleet(&self, index: FleetIndex) -> &FleetData {
        &self.fleets[index.0]
    }

    pub fn fleet_mut(&mut self, index: FleetIndex) -> &mut FleetData {
        &mut self.fleets[index.0]
    }

    pub fn fleets(&self) -> &[FleetData] {
        &self.fleets
    }

    /// Adds an attack-list entry to the given fleet: a unit it may attack,
    /// plus a rating bonus that biases target selection.
    pub fn add_attack_list_entry(&mut self, fleet: FleetIndex, target: UnitIndex, rating_bonus: i16) {
        self.fleets[fleet.0].attack_list.push(AttackListEntry { target, rating_bonus });
    }

    /*
     *  Ships
     */

    /// Adds a ship to the most-recently-added fleet.
    pub fn add_ship(&mut self, ship: UnitData) -> Result<UnitIndex> {
        let fleet = self
            .fleets
            .last_mut()
            .ok_or_else(|| FlakError::SetupInvariantViolated("addFleet missing".into()))?;
        if ship.owner != fleet.player {
            return Err(FlakError::SetupInvariantViolated("player mismatch".into()));
        }
        if self.units.len() != fleet.first_ship_index + fleet.num_ships {
            return Err(FlakError::SetupInvariantViolated("index mismatch".into()));
        }
        fleet.num_ships += 1;
        self.units.push(ship);
        Ok(UnitIndex(self.units.len() - 1))
    }

    pub fn num_ships(&self) -> usize {
        self.units.len()
    }

    pub fn ship(&self, index: UnitIndex) -> &UnitData {
        &self.units[index.0]
    }

    pub fn ships(&self) -> &[UnitData] {
        &self.units
    }

    pub fn ships_mut(&mut self) -> &mut [UnitData] {
        &mut self.units
    }

    /*
     *  Other attributes
     */

    pub fn total_time(&self) -> i32 {
        self.total_time
    }

    pub fn set_total_time(&mut self, time: i32) {
        self.total_time = time;
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.position
    }

    pub fn set_position(&mut self, pos: (i32, i32)) {
        self.position = Some(pos);
    }

    pub fn ambient_flags(&self) -> i32 {
        self.ambient_flags
    }

    pub fn set_ambient_flags(&mut self, flags: i32) {
        self.ambient_flags = flags;
    }

    /*
     *  Setup
     */

    /// After having set up a fight, call this to compute derived
    /// information and remove units not needed for the fight, in order:
    /// passive-object pruning, fleet-speed derivation, initial positions,
    /// and (optionally) strength adjustment.
    pub fn init_after_setup(&mut self, config: &Configuration, env: &dyn Environment, rng: &mut Lcg) -> Result<()> {
        self.remove_passive_objects();
        self.compute_fleet_speeds(env);
        self.compute_initial_positions(config, rng)?;
        if config.compensation_adjust > 0 {
            self.adjust_strengths(config.compensation_adjust, config);
        }
        Ok(())
    }

    /// Units which are not attackable should not appear in the data, so as
    /// to not leak information. A unit which is in no attack list with a
    /// positive rating bonus cannot itself attack anyone and is useless.
    fn remove_passive_objects(&mut self) {
        let mut keep = vec![false; self.units.len()];
        for fleet in &self.fleets {
            for entry in &fleet.attack_list {
                if entry.rating_bonus > 0 {
                    keep[entry.target.0] = true;
                }
            }
        }

        let mut new_ids: Vec<Option<usize>> = vec![None; self.units.len()];
        let mut new_units = Vec::with_capacity(self.units.len());
        for (i, unit) in self.units.iter().enumerate() {
            if keep[i] {
                new_ids[i] = Some(new_units.len());
                new_units.push(unit.clone());
            }
        }
        self.units = new_units;

        let mut new_fleets = Vec::with_capacity(self.fleets.len());
        for fleet in &self.fleets {
            let new_attack_list: Vec<AttackListEntry> = fleet
                .attack_list
                .iter()
                .filter_map(|entry| {
                    new_ids[entry.target.0].map(|t| AttackListEntry {
                        target: UnitIndex(t),
                        rating_bonus: entry.rating_bonus,
                    })
                })
                .collect();

            let surviving_old_indices: Vec<usize> = fleet.ship_range().filter(|&i| new_ids[i].is_some()).collect();
            if surviving_old_indices.is_empty() {
                continue;
            }
            let first_ship_index = new_ids[surviving_old_indices[0]].unwrap();
            new_fleets.push(FleetData {
                player: fleet.player,
                speed: fleet.speed,
                initial_x: fleet.initial_x,
                initial_y: fleet.initial_y,
                first_ship_index,
                num_ships: surviving_old_indices.len(),
                attack_list: new_attack_list,
            });
        }
        self.fleets = new_fleets;
    }

    /// Each fleet's speed is the minimum over its units; a planet counts as
    /// speed 0.
    fn compute_fleet_speeds(&mut self, env: &dyn Environment) {
        for fleet in &mut self.fleets {
            let mut speed = 0;
            for (j, unit_index) in fleet.ship_range().enumerate() {
                let unit = &self.units[unit_index];
                let this_speed = if unit.is_planet {
                    0
                } else {
                    env.get_configuration_for_player(ArrayOption::ShipMovementSpeed, unit.owner)
                };
                if j == 0 || this_speed < speed {
                    speed = this_speed;
                }
            }
            fleet.speed = speed;
        }
    }

    fn compute_initial_positions(&mut self, config: &Configuration, rng: &mut Lcg) -> Result<()> {
        let mut planet_owner = 0;
        let mut seen: Vec<i32> = Vec::new();
        for (i, unit) in self.units.iter().enumerate() {
            if !(1..=FLAK_NUM_OWNERS).contains(&unit.owner) {
                return Err(FlakError::SetupInvariantViolated("player range".into()));
            }
            if unit.is_planet {
                if planet_owner != 0 {
                    return Err(FlakError::SetupInvariantViolated("multiple planets".into()));
                }
                planet_owner = unit.owner;
            }
            if i == 0 || unit.owner != self.units[i - 1].owner {
                if seen.contains(&unit.owner) {
                    return Err(FlakError::SetupInvariantViolated("discontinuity".into()));
                }
                seen.push(unit.owner);
            }
        }
        // Player numbers, not first-appearance order: the original builds
        // this list by scanning 1..=FLAK_NUM_OWNERS against a player set, so
        // the pre-shuffle order (and hence every RNG draw after it) depends
        // on player number, not on unit array position.
        let mut player_list: Vec<i32> = (1..=FLAK_NUM_OWNERS).filter(|p| seen.contains(p)).collect();
        let num_players = player_list.len() as i32;

        // Fisher-Yates shuffle using the setup RNG, matching the source's
        // exact swap order (this feeds the deterministic tick sequence, so
        // it cannot be replaced with a library shuffle).
        for i in (1..player_list.len()).rev() {
            let j = rng.next((i + 1) as u16) as usize;
            player_list.swap(i, j);
        }

        let offs = config.starting_distance_per_player * num_players;
        let mut counter = 0;
        for &player in &player_list {
            if planet_owner != 0 {
                if player == planet_owner {
                    self.assign_initial_positions(player, 0.0, config.starting_distance_planet + offs, config);
                } else {
                    let angle = PI / 2.0 + (2 * counter + 1) as f64 * (PI / 2.0) / (num_players - 1) as f64;
                    self.assign_initial_positions(player, angle, config.starting_distance_ship + offs, config);
                    counter += 1;
                }
            } else {
                let angle = PI / 2.0 + (2 * counter + 1) as f64 * PI / num_players as f64;
                self.assign_initial_positions(player, angle, config.starting_distance_ship + offs, config);
                counter += 1;
            }
        }
        Ok(())
    }

    fn assign_initial_positions(&mut self, player: i32, mut angle: f64, mut dist: i32, config: &Configuration) {
        let mut offset = config.starting_distance_per_fleet;
        for fleet in &mut self.fleets {
            if fleet.player != player {
                continue;
            }
            if fleet.speed > offset {
                offset = fleet.speed;
            }
            fleet.initial_x = (angle.cos() * dist as f64).round() as i32;
            fleet.initial_y = (angle.sin() * dist as f64).round() as i32;
            dist += offset;
            angle += PI / 180.0;
        }
    }

    fn adjust_strengths(&mut self, adjust_to: i32, config: &Configuration) {
        let total_strength: i32 = self.units.iter().map(|u| u.compensation).sum();
        let target_strength = self.units.len() as i32 * adjust_to;
        if total_strength != 0 && total_strength < target_strength {
            for unit in &mut self.units {
                let new_val = unit.compensation * target_strength / total_strength;
                unit.compensation = new_val.min(config.compensation_limit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::ExperienceOption;
    use crate::environment::ScalarOption;

    struct FakeEnv;
    impl Environment for FakeEnv {
        fn get_configuration(&self, _option: ScalarOption) -> i32 {
            0
        }
        fn get_configuration_for_player(&self, option: ArrayOption, _player: i32) -> i32 {
            match option {
                ArrayOption::ShipMovementSpeed => 100,
                _ => 0,
            }
        }
        fn get_experience_configuration(&self, _option: ExperienceOption, _level: i32, _player: i32) -> i32 {
            0
        }
        fn get_beam_kill_power(&self, _t: i32) -> i32 {
            0
        }
        fn get_beam_damage_power(&self, _t: i32) -> i32 {
            0
        }
        fn get_torpedo_kill_power(&self, _t: i32) -> i32 {
            0
        }
        fn get_torpedo_damage_power(&self, _t: i32) -> i32 {
            0
        }
        fn get_player_race_number(&self, _player: i32) -> i32 {
            1
        }
    }

    fn unit(owner: i32) -> UnitData {
        UnitData {
            owner,
            mass: 100,
            ..Default::default()
        }
    }

    #[test]
    fn passive_objects_with_no_positive_attack_list_entry_are_removed() {
        let mut setup = Setup::new();
        let f1 = setup.add_fleet(1);
        let s1 = setup.add_ship(unit(1)).unwrap();
        let f2 = setup.add_fleet(2);
        let _s2 = setup.add_ship(unit(2)).unwrap();

        // s1 attacks s2's fleet's unit, but with a zero bonus: it stays passive.
        setup.add_attack_list_entry(f2, s1, 0);
        setup.remove_passive_objects();

        assert_eq!(setup.num_ships(), 0);
        assert_eq!(setup.num_fleets(), 0);
        let _ = f1;
    }

    #[test]
    fn passive_objects_referenced_with_positive_bonus_survive() {
        let mut setup = Setup::new();
        let f1 = setup.add_fleet(1);
        let s1 = setup.add_ship(unit(1)).unwrap();
        let f2 = setup.add_fleet(2);
        let s2 = setup.add_ship(unit(2)).unwrap();
        setup.add_attack_list_entry(f1, s2, 5);
        setup.add_attack_list_entry(f2, s1, 5);

        setup.remove_passive_objects();

        assert_eq!(setup.num_ships(), 2);
        assert_eq!(setup.num_fleets(), 2);
    }

    #[test]
    fn fleet_speed_is_minimum_over_units_and_zero_for_planets() {
        let mut setup = Setup::new();
        setup.add_fleet(1);
        setup.add_ship(unit(1)).unwrap();
        let mut planet = unit(1);
        planet.is_planet = true;
        setup.add_ship(planet).unwrap();

        setup.compute_fleet_speeds(&FakeEnv);
        assert_eq!(setup.fleets()[0].speed, 0);
    }

    #[test]
    fn strength_adjustment_clamps_to_compensation_limit() {
        let mut setup = Setup::new();
        setup.add_fleet(1);
        let mut u = unit(1);
        u.compensation = 1;
        setup.add_ship(u).unwrap();

        let config = Configuration {
            compensation_adjust: 100,
            compensation_limit: 50,
            ..Default::default()
        };
        setup.adjust_strengths(config.compensation_adjust, &config);
        assert_eq!(setup.ships()[0].compensation, 50);
    }
}
