//! The per-tick combat and movement phases: recharging weapons, launching
//! fighters, firing torpedoes and beams, fighter-vs-fighter interception,
//! moving every object in flight, and the two garbage-collection passes that
//! remove what died this tick.

use super::Algorithm;
use crate::definitions::*;
use crate::environment::Environment;
use crate::fleet::FleetIndex;
use crate::position::Position;
use crate::transient::{ObjectKind, TransientObject};
use crate::unit::UnitIndex;
use crate::visualizer::Visualizer;

/// Normal (not round-half-up) rounding, used for positions which may be
/// negative; the damage-formula rounding in `combat.rs` is deliberately
/// different and must stay that way.
fn round_to_int(x: f64) -> i32 {
    x.round() as i32
}

impl Algorithm {
    /// Recharges one ship's countdown timer, received-torpedo backlog, and
    /// bay/beam/tube charges. A no-op for a dead ship.
    pub(super) fn recharge_ship(&mut self, ship: UnitIndex) {
        if !self.unit_status[ship.0].alive {
            return;
        }

        if self.unit_status[ship.0].launch_countdown > 0 {
            self.unit_status[ship.0].launch_countdown -= 1;
        }
        if self.unit_status[ship.0].received_torpedoes > 0 {
            self.unit_status[ship.0].received_torpedoes -= 1;
            self.unit_status[ship.0].torpedoes += 1;
        }

        let config = self.unit_config[ship.0];
        for i in 0..self.unit_status[ship.0].bay_charge.len() {
            if self.unit_status[ship.0].bay_charge[i] < 1000 {
                self.unit_status[ship.0].bay_charge[i] += self.rng.next(config.bay_recharge_rate as u16) as i32;
            }
        }
        for i in 0..self.unit_status[ship.0].beam_charge.len() {
            if self.unit_status[ship.0].beam_charge[i] < 1000 {
                self.unit_status[ship.0].beam_charge[i] += self.rng.next(config.beam_recharge_rate as u16) as i32;
            }
        }
        if self.unit_status[ship.0].torpedoes != 0 {
            for i in 0..self.unit_status[ship.0].tube_charge.len() {
                if self.unit_status[ship.0].tube_charge[i] < 1000 {
                    self.unit_status[ship.0].tube_charge[i] += self.rng.next(config.tube_recharge_rate as u16) as i32;
                }
            }
        }
    }

    /// Launches at most one fighter per ship in the fleet, from the
    /// lowest-numbered bay that's fully charged.
    pub(super) fn launch_fighters(&mut self, fleet_nr: FleetIndex, vis: &mut dyn Visualizer) {
        if !self.fleet_status[fleet_nr.0].alive {
            return;
        }
        let enemy = match self.fleet_status[fleet_nr.0].enemy {
            Some(e) if self.unit_status[e.0].alive => e,
            _ => return,
        };

        for i in self.fleets[fleet_nr.0].ship_range() {
            if !self.unit_status[i].alive || self.units[i].num_bays == 0 || self.unit_status[i].fighters_remaining == 0 {
                continue;
            }
            if self.unit_status[i].launch_countdown != 0 || self.unit_status[i].fighters_in_flight >= self.units[i].max_fighters_launched {
                continue;
            }

            let bay = (0..self.units[i].num_bays as usize).find(|&b| self.unit_status[i].bay_charge[b] >= 1000);
            let Some(bay) = bay else { continue };

            let vis_id = self.next_vis_id();
            let pos = self.ship_position(UnitIndex(i));
            let config = self.unit_config[i];
            let owner = self.units[i].owner;

            let obj = TransientObject {
                kind: ObjectKind::Fighter,
                vis_id,
                owner_unit: Some(UnitIndex(i)),
                owner_player: owner,
                enemy: Some(enemy),
                position: pos,
                strikes: config.strikes_per_fighter,
                can_change_enemy: true,
                kill: config.fighter_beam_kill,
                explosive: config.fighter_beam_explosive,
                death_flag: 1,
                speed: config.fighter_movement_speed,
                marked_for_deletion: false,
            };

            self.unit_status[i].bay_charge[bay] = 0;
            self.unit_status[i].fighters_remaining -= 1;
            self.unit_status[i].fighters_in_flight += 1;
            self.unit_status[i].launch_countdown = config.bay_launch_interval;
            if self.unit_status[i].fighters_remaining < self.unit_status[i].min_fighters_aboard {
                self.unit_status[i].min_fighters_aboard = self.unit_status[i].fighters_remaining;
            }

            let player_idx = (owner - 1) as usize;
            self.players[player_idx].has_ever_had_fighters = true;
            vis.create_fighter(vis_id, pos, owner, Some(enemy));
            self.players[player_idx].objects.push(obj);
        }
    }

    /// Fires at most one torpedo per ship in the fleet, throttled by
    /// `torp_launch_limit`.
    pub(super) fn fire_torps(&mut self, fleet_nr: FleetIndex, env: &dyn Environment, vis: &mut dyn Visualizer) {
        if !self.fleet_status[fleet_nr.0].alive {
            return;
        }
        let enemy = match self.fleet_status[fleet_nr.0].enemy {
            Some(e) if self.unit_status[e.0].alive => e,
            _ => return,
        };

        let enemy_fleet = self.units[enemy.0].fleet.expect("ship without a fleet");
        let enemy_pos = self.fleet_position(enemy_fleet);
        let my_pos = self.fleet_position(fleet_nr);

        for i in self.fleets[fleet_nr.0].ship_range() {
            if !self.unit_status[i].alive || self.unit_status[i].torpedoes == 0 {
                continue;
            }
            if !my_pos.is_distance_le_radius(&enemy_pos, self.unit_config[i].torp_firing_range) {
                continue;
            }

            let limit = self.unit_status[i].torp_launch_limit.max(0) as usize;
            let tube = (0..limit).find(|&t| self.unit_status[i].tube_charge[t] >= 1000);
            let Some(tube) = tube else { continue };

            let vis_id = self.next_vis_id();
            let pos = self.ship_position(UnitIndex(i));
            let mut kill = env.get_torpedo_kill_power(self.units[i].torpedo_type);
            let mut expl = env.get_torpedo_damage_power(self.units[i].torpedo_type);
            let death_flag = expl;
            if !self.alternative_combat {
                kill *= 2;
                expl *= 2;
            }
            let strikes = if (self.rng.next(100) as i32) < self.unit_config[i].torp_hit_odds { 1 } else { 0 };

            let owner = self.units[i].owner;
            let obj = TransientObject {
                kind: ObjectKind::Torpedo,
                vis_id,
                owner_unit: Some(UnitIndex(i)),
                owner_player: owner,
                enemy: Some(enemy),
                position: pos,
                strikes,
                can_change_enemy: false,
                kill,
                explosive: expl,
                death_flag,
                speed: FLAK_TORP_MOVEMENT_SPEED,
                marked_for_deletion: false,
            };

            self.unit_status[i].tube_charge[tube] = 0;
            self.unit_status[i].torpedoes -= 1;

            vis.create_torpedo(vis_id, pos, owner, Some(enemy));
            self.players[(owner - 1) as usize].objects.push(obj);
        }
    }

    /// Fires every ship's beams in the fleet: an anti-fighter pass first (at
    /// most one shot per ship), then an anti-ship pass against the fleet's
    /// enemy if no fighter was worth shooting at.
    pub(super) fn fire_beams(&mut self, fleet_nr: FleetIndex, env: &dyn Environment, vis: &mut dyn Visualizer) {
        if !self.fleet_status[fleet_nr.0].alive {
            return;
        }

        let my_enemy = self.fleet_status[fleet_nr.0].enemy;
        let dist = match my_enemy {
            Some(enemy) => {
                let enemy_fleet = self.units[enemy.0].fleet.expect("ship without a fleet");
                self.fleet_position(fleet_nr).distance_to(&self.fleet_position(enemy_fleet))
            }
            None => 1.0e15,
        };

        for ship in self.fleets[fleet_nr.0].ship_range() {
            if !self.unit_status[ship.0].alive {
                continue;
            }

            let mut fired = false;
            let ship_owner = self.units[ship.0].owner;

            for beam in 0..self.units[ship.0].num_beams as usize {
                if self.unit_status[ship.0].beam_charge[beam] < self.unit_config[ship.0].beam_hit_fighter_charge {
                    continue;
                }

                let ship_pos = self.fleet_position(fleet_nr);
                let beam_firing_range = self.unit_config[ship.0].beam_firing_range as f64;

                let mut best: Option<(usize, usize, f64)> = None;
                for player_idx in 0..self.players.len() {
                    if self.players[player_idx].player == ship_owner {
                        continue;
                    }
                    for obj_idx in (0..self.players[player_idx].objects.len()).rev() {
                        let candidate = &self.players[player_idx].objects[obj_idx];
                        if !candidate.is_fighter() {
                            continue;
                        }

                        let relevant = match (candidate.enemy, candidate.owner_unit, my_enemy) {
                            (Some(c_enemy), Some(c_owner), Some(my_enemy_unit)) => {
                                let my_enemy_fleet = self.units[my_enemy_unit.0].fleet;
                                self.units[c_enemy.0].fleet == Some(fleet_nr) || self.units[c_owner.0].fleet == my_enemy_fleet
                            }
                            _ => false,
                        };
                        if !relevant {
                            continue;
                        }

                        let fdist = ship_pos.distance_to(&candidate.position);
                        if fdist > beam_firing_range {
                            continue;
                        }

                        let better = match best {
                            None => true,
                            Some((bp, bo, bdist)) => {
                                let incumbent = &self.players[bp].objects[bo];
                                if self.fire_on_attack_fighters && incumbent.strikes == 0 && candidate.strikes > 0 {
                                    true
                                } else {
                                    fdist <= bdist
                                        && (!self.fire_on_attack_fighters
                                            || (incumbent.strikes == 0 && candidate.strikes == 0)
                                            || (incumbent.strikes > 0 && candidate.strikes > 0))
                                }
                            }
                        };
                        if better {
                            best = Some((player_idx, obj_idx, fdist));
                        }
                    }
                }

                if let Some((p_idx, o_idx, _)) = best {
                    let target_vis_id = self.players[p_idx].objects[o_idx].vis_id;
                    let target_owner = self.players[p_idx].objects[o_idx].owner_unit;
                    let hits = (self.rng.next(100) as i32) < self.unit_config[ship.0].beam_hit_odds;
                    if hits {
                        vis.fire_beam_ship_fighter(UnitIndex(ship), beam as i32, target_vis_id, true);
                        vis.kill_fighter(target_vis_id);
                        self.players[p_idx].objects[o_idx].marked_for_deletion = true;
                        if let Some(owner_unit) = target_owner {
                            self.unit_status[owner_unit.0].fighters_in_flight -= 1;
                        }
                    } else {
                        vis.fire_beam_ship_fighter(UnitIndex(ship), beam as i32, target_vis_id, false);
                    }
                    self.unit_status[ship.0].beam_charge[beam] = 0;
                    fired = true;
                    break;
                }
            }

            if fired {
                continue;
            }

            if let Some(enemy) = my_enemy {
                if self.unit_status[enemy.0].alive && dist <= self.unit_config[ship.0].beam_firing_range as f64 {
                    for beam in 0..self.units[ship.0].num_beams as usize {
                        if self.unit_status[ship.0].beam_charge[beam] < self.unit_config[ship.0].beam_hit_ship_charge {
                            continue;
                        }

                        let mut kill = env.get_beam_kill_power(self.units[ship.0].beam_type);
                        let damage = env.get_beam_damage_power(self.units[ship.0].beam_type);
                        if env.get_player_race_number(ship_owner) == FLAK_RACE_PRIVATEER {
                            kill *= 3;
                        }

                        let charge = self.unit_status[ship.0].beam_charge[beam] as i64;
                        let hits = (self.rng.next(100) as i32) < self.unit_config[ship.0].beam_hit_odds;
                        if hits {
                            vis.fire_beam_ship_ship(UnitIndex(ship), beam as i32, enemy, true);
                            let scaled_damage = (damage as i64 * charge / 1000) as i32;
                            let scaled_kill = (kill as i64 * charge / 1000) as i32;
                            self.hit_ship_with(enemy, UnitIndex(ship), scaled_damage, scaled_kill, damage);
                        } else {
                            vis.fire_beam_ship_ship(UnitIndex(ship), beam as i32, enemy, false);
                        }
                        self.unit_status[ship.0].beam_charge[beam] = 0;
                        break;
                    }
                }
            }
        }
    }

    /// Every live fighter of `player_idx` with a strike left fires at its
    /// target if it's in range.
    pub(super) fn fighters_fire(&mut self, player_idx: usize, vis: &mut dyn Visualizer) {
        let mut ip = self.players[player_idx].objects.len();
        while ip > 0 {
            ip -= 1;
            if !self.players[player_idx].objects[ip].is_fighter() || self.players[player_idx].objects[ip].strikes == 0 {
                continue;
            }
            let Some(enemy) = self.players[player_idx].objects[ip].enemy else { continue };
            if !self.unit_status[enemy.0].alive {
                continue;
            }

            let owner_unit = self.players[player_idx].objects[ip].owner_unit;
            let firing_range = owner_unit.map_or(0, |u| self.unit_config[u.0].fighter_firing_range);
            let pos = self.players[player_idx].objects[ip].position;
            let enemy_fleet = self.units[enemy.0].fleet.expect("ship without a fleet");
            let enemy_fleet_pos = self.fleet_position(enemy_fleet);

            if !pos.is_distance_le_radius(&enemy_fleet_pos, firing_range) {
                continue;
            }

            let vis_id = self.players[player_idx].objects[ip].vis_id;
            let kill = self.players[player_idx].objects[ip].kill;
            let explosive = self.players[player_idx].objects[ip].explosive;
            let death_flag = self.players[player_idx].objects[ip].death_flag;

            vis.fire_beam_fighter_ship(vis_id, enemy, true);
            self.hit_ship_with(enemy, owner_unit.expect("fighter without owner"), kill, explosive, death_flag);
            self.players[player_idx].objects[ip].strikes -= 1;
            self.players[player_idx].objects[ip].can_change_enemy = false;
        }
    }

    /// Tries one fighter-vs-fighter kill between `player_a` and `player_b`'s
    /// fighters; stops at the first successful intercept, if any.
    pub(super) fn fighter_intercept(&mut self, player_a: usize, player_b: usize, vis: &mut dyn Visualizer) {
        if self.players[player_a].fighter_kill_odds == 0 && self.players[player_b].fighter_kill_odds == 0 {
            return;
        }

        let mut ia = self.players[player_a].objects.len();
        while ia > 0 {
            ia -= 1;
            if !self.players[player_a].objects[ia].is_fighter() {
                continue;
            }

            let mut ib = self.players[player_b].objects.len();
            while ib > 0 {
                ib -= 1;
                if !self.players[player_b].objects[ib].is_fighter() {
                    continue;
                }

                let pa_owner = self.players[player_a].objects[ia].owner_unit;
                let pb_owner = self.players[player_b].objects[ib].owner_unit;
                let pa_enemy = self.players[player_a].objects[ia].enemy;
                let pb_enemy = self.players[player_b].objects[ib].enemy;

                if pa_owner.is_none() || pb_owner.is_none() || (pa_enemy != pb_owner && pb_enemy != pa_owner) {
                    continue;
                }

                if self.try_intercept(player_a, ia, player_b, ib, vis) {
                    return;
                }
            }
        }
    }

    fn try_intercept(&mut self, player_a: usize, ia: usize, player_b: usize, ib: usize, vis: &mut dyn Visualizer) -> bool {
        let pos_a = self.players[player_a].objects[ia].position;
        let pos_b = self.players[player_b].objects[ib].position;
        if !pos_a.is_distance_le_radius(&pos_b, FLAK_FIGHTER_INTERCEPT_RANGE) {
            return false;
        }

        let owner_a = self.players[player_a].objects[ia].owner_unit.expect("checked by caller");
        let owner_b = self.players[player_b].objects[ib].owner_unit.expect("checked by caller");
        let odds_a = self.unit_config[owner_a.0].fighter_kill_odds;
        let odds_b = self.unit_config[owner_b.0].fighter_kill_odds;

        // FIXME: not sure the probabilities here are right; this yields
        // one_f == 0 if both are 100.
        let left_f = (100 - odds_a) * odds_b;
        let right_f = (100 - odds_b) * odds_a;
        let one_f = (left_f + right_f) / 100;
        if one_f == 0 {
            return false;
        }
        let right_probab = right_f / one_f;

        if self.rng.next(100) as i32 >= one_f {
            return false;
        }

        let vis_id_a = self.players[player_a].objects[ia].vis_id;
        let vis_id_b = self.players[player_b].objects[ib].vis_id;

        if (self.rng.next(100) as i32) < right_probab {
            vis.fire_beam_fighter_fighter(vis_id_b, vis_id_a, true);
            vis.kill_fighter(vis_id_a);
            self.players[player_a].objects[ia].marked_for_deletion = true;
            self.unit_status[owner_a.0].fighters_in_flight -= 1;
        } else {
            vis.fire_beam_fighter_fighter(vis_id_a, vis_id_b, true);
            vis.kill_fighter(vis_id_b);
            self.players[player_b].objects[ib].marked_for_deletion = true;
            self.unit_status[owner_b.0].fighters_in_flight -= 1;
        }
        true
    }

    /// Finds the closest fleet of `player` with a living bay-carrier, and
    /// returns its heaviest such ship. Distance ties go to the
    /// lowest-numbered fleet; a closer fleet with no bay-carrier never blocks
    /// a farther one that has one, since `min_dist` only moves when a ship is
    /// actually found.
    fn find_new_base(&self, player: i32, fighter_pos: Position) -> Option<UnitIndex> {
        let mut min_dist = 1.0e15_f64;
        let mut min_ship = None;

        for f in 0..self.fleets.len() {
            if self.fleets[f].player != player {
                continue;
            }
            let this_dist = self.fleet_position(FleetIndex(f)).distance_to(&fighter_pos);
            if this_dist < min_dist {
                let mut max_mass = 0;
                for j in self.fleets[f].ship_range() {
                    if self.unit_status[j].alive && self.units[j].num_bays != 0 && self.units[j].mass > max_mass {
                        max_mass = self.units[j].mass;
                        min_dist = this_dist;
                        min_ship = Some(UnitIndex(j));
                    }
                }
            }
        }
        min_ship
    }

    /// Moves every fighter/torpedo belonging to `player_idx` one step,
    /// resolving impacts, retreats, and landings along the way.
    pub(super) fn move_stuff(&mut self, player_idx: usize, vis: &mut dyn Visualizer) {
        let mut ip = self.players[player_idx].objects.len();
        while ip > 0 {
            ip -= 1;
            match self.players[player_idx].objects[ip].kind {
                ObjectKind::Torpedo => self.move_torpedo(player_idx, ip, vis),
                ObjectKind::Fighter => self.move_fighter(player_idx, ip, vis),
            }
        }
    }

    /// Moves `obj_idx` a `speed`-sized step toward `target`, returning the
    /// remaining distance (`0` means arrival this tick).
    fn move_object_towards(&mut self, player_idx: usize, obj_idx: usize, target: Position) -> i32 {
        let obj = &mut self.players[player_idx].objects[obj_idx];
        let dist = obj.position.distance_to(&target);
        let new_dist = dist - obj.speed as f64;
        if new_dist <= 0.0 {
            obj.position = target;
            0
        } else {
            let x = target.x + round_to_int((obj.position.x - target.x) as f64 * new_dist / dist);
            let y = target.y + round_to_int((obj.position.y - target.y) as f64 * new_dist / dist);
            let z = target.z + round_to_int((obj.position.z - target.z) as f64 * new_dist / dist);
            obj.position = Position::new(x, y, z);
            new_dist as i32
        }
    }

    fn move_torpedo(&mut self, player_idx: usize, ip: usize, vis: &mut dyn Visualizer) {
        let enemy = self.players[player_idx].objects[ip].enemy.expect("torpedo without a target");
        let enemy_pos = self.ship_position(enemy);
        let vis_id = self.players[player_idx].objects[ip].vis_id;

        if self.move_object_towards(player_idx, ip, enemy_pos) != 0 {
            let pos = self.players[player_idx].objects[ip].position;
            vis.move_torpedo(vis_id, pos);
            return;
        }

        if self.players[player_idx].objects[ip].strikes != 0 {
            let mut target = enemy;
            let enemy_fleet = self.units[enemy.0].fleet.expect("ship without a fleet");
            if !self.unit_status[enemy.0].alive && self.fleet_status[enemy_fleet.0].alive {
                let n = self.fleets[enemy_fleet.0].num_ships as u16;
                let pick = self.rng.next(n) as usize;
                target = UnitIndex(self.fleets[enemy_fleet.0].first_ship_index + pick);
            }

            if self.unit_status[target.0].alive {
                self.players[player_idx].objects[ip].enemy = Some(target);
                vis.hit_torpedo(vis_id, target);

                let owner = self.players[player_idx].objects[ip].owner_unit.expect("torpedo without an owner");
                let expl = self.players[player_idx].objects[ip].explosive;
                let kill = self.players[player_idx].objects[ip].kill;
                let death_flag = self.players[player_idx].objects[ip].death_flag;
                self.hit_ship_with(target, owner, expl, kill, death_flag);
                self.unit_status[owner.0].torps_hit += 1;
            } else {
                self.players[player_idx].objects[ip].enemy = None;
                vis.miss_torpedo(vis_id);
            }
        } else {
            vis.miss_torpedo(vis_id);
        }

        self.players[player_idx].objects[ip].marked_for_deletion = true;
    }

    fn move_fighter(&mut self, player_idx: usize, ip: usize, vis: &mut dyn Visualizer) {
        let vis_id = self.players[player_idx].objects[ip].vis_id;
        let mut strikes = self.players[player_idx].objects[ip].strikes;

        if strikes != 0 {
            let enemy = self.players[player_idx].objects[ip].enemy;
            let enemy_alive = enemy.map_or(false, |e| self.unit_status[e.0].alive);

            if !enemy_alive {
                if !self.players[player_idx].objects[ip].can_change_enemy {
                    strikes = 0;
                } else {
                    let owner = self.players[player_idx].objects[ip].owner_unit;
                    let owner_alive = owner.map_or(false, |o| self.unit_status[o.0].alive);

                    if let Some(owner) = owner.filter(|_| owner_alive) {
                        let owner_fleet = self.units[owner.0].fleet.expect("ship without a fleet");
                        let base_enemy = self.fleet_status[owner_fleet.0].enemy;
                        if base_enemy != enemy {
                            self.players[player_idx].objects[ip].enemy = base_enemy;
                            strikes >>= 1;
                        } else {
                            strikes -= 1;
                        }
                    } else {
                        let fighter_pos = self.players[player_idx].objects[ip].position;
                        let player = player_idx as i32 + 1;
                        let new_base = self.find_new_base(player, fighter_pos);
                        self.players[player_idx].objects[ip].owner_unit = new_base;
                        self.players[player_idx].objects[ip].enemy = match new_base {
                            Some(ship) => {
                                self.unit_status[ship.0].fighters_in_flight += 1;
                                let new_fleet = self.units[ship.0].fleet.expect("ship without a fleet");
                                self.fleet_status[new_fleet.0].enemy
                            }
                            None => None,
                        };
                    }
                }
            }
        }

        let enemy = self.players[player_idx].objects[ip].enemy;
        if enemy.is_none() || self.players[player_idx].num_live_units == 0 {
            strikes = 0;
        }
        self.players[player_idx].objects[ip].strikes = strikes;

        if strikes == 0 {
            let owner = self.players[player_idx].objects[ip].owner_unit;
            let owner_alive = owner.map_or(false, |o| self.unit_status[o.0].alive);
            let owner = if owner.is_none() || !owner_alive {
                let fighter_pos = self.players[player_idx].objects[ip].position;
                let player = player_idx as i32 + 1;
                let new_base = self.find_new_base(player, fighter_pos);
                self.players[player_idx].objects[ip].owner_unit = new_base;
                if let Some(ship) = new_base {
                    self.unit_status[ship.0].fighters_in_flight += 1;
                }
                new_base
            } else {
                owner
            };

            match owner {
                None => {
                    vis.land_fighter(vis_id);
                    self.players[player_idx].objects[ip].marked_for_deletion = true;
                }
                Some(base) => {
                    let base_pos = self.ship_position(base);
                    if self.move_object_towards(player_idx, ip, base_pos) == 0 {
                        vis.land_fighter(vis_id);
                        self.players[player_idx].objects[ip].marked_for_deletion = true;
                        self.unit_status[base.0].fighters_remaining += 1;
                        self.unit_status[base.0].fighters_in_flight -= 1;
                    } else {
                        let pos = self.players[player_idx].objects[ip].position;
                        vis.move_fighter(vis_id, pos, Some(base));
                    }
                }
            }
        } else {
            let enemy = enemy.expect("strikes != 0 implies an enemy");
            let enemy_pos = self.ship_position(enemy);
            self.move_object_towards(player_idx, ip, enemy_pos);
            let pos = self.players[player_idx].objects[ip].position;
            vis.move_fighter(vis_id, pos, Some(enemy));
        }
    }

    /// Kills every ship over the damage/crew death threshold, redistributes
    /// the dead's torpedoes among survivors, and marks the fleet dead if
    /// nothing is left.
    pub(super) fn do_fleet_gc(&mut self, fleet_nr: FleetIndex, env: &dyn Environment, vis: &mut dyn Visualizer) {
        if !self.fleet_status[fleet_nr.0].alive {
            return;
        }

        let limit = if env.get_player_race_number(self.fleets[fleet_nr.0].player) == FLAK_RACE_LIZARD {
            FLAK_DAMAGE_SURVIVAL_LIMIT_LIZARD
        } else {
            FLAK_DAMAGE_SURVIVAL_LIMIT
        };

        let mut alive = false;
        let mut any_torps = false;
        let mut torps = [0i32; FLAK_MAX_TORPS];

        for i in self.fleets[fleet_nr.0].ship_range() {
            if !self.unit_status[i].alive {
                continue;
            }
            if self.unit_status[i].damage > limit || (!self.units[i].is_planet && self.unit_status[i].crew < 0.5) {
                vis.kill_ship(UnitIndex(i));
                self.unit_status[i].alive = false;
                let owner_idx = (self.units[i].owner - 1) as usize;
                self.players[owner_idx].num_live_units -= 1;
                self.players[owner_idx].sum_strength -= self.units[i].compensation;

                let tt = self.units[i].torpedo_type;
                if tt > 0 && (tt as usize) <= FLAK_MAX_TORPS && self.unit_status[i].torpedoes > 0 {
                    any_torps = true;
                    torps[(tt - 1) as usize] += self.unit_status[i].torpedoes;
                }
            } else {
                alive = true;
            }
        }

        if !alive {
            vis.kill_fleet(fleet_nr);
        }
        self.fleet_status[fleet_nr.0].alive = alive;

        if alive && any_torps {
            let num_ships = self.fleets[fleet_nr.0].num_ships as i32;
            for i in self.fleets[fleet_nr.0].ship_range() {
                let tt = self.units[i].torpedo_type;
                if self.unit_status[i].alive && tt > 0 && (tt as usize) <= FLAK_MAX_TORPS {
                    self.unit_status[i].received_torpedoes += torps[(tt - 1) as usize] / num_ships;
                }
            }
        }
    }

    /// Removes every object of `player_idx` marked for deletion this tick,
    /// returning its `VisId` to the free list.
    pub(super) fn do_player_gc(&mut self, player_idx: usize) {
        let mut out = 0;
        let n = self.players[player_idx].objects.len();
        for i in 0..n {
            if !self.players[player_idx].objects[i].marked_for_deletion {
                self.players[player_idx].objects.swap(i, out);
                out += 1;
            }
        }
        while self.players[player_idx].objects.len() > out {
            let obj = self.players[player_idx].objects.pop().expect("len > out implies nonempty");
            self.free_object_ids.push(obj.vis_id);
        }
    }

    /// Computes (but does not apply) a fleet's position for next tick:
    /// chase its enemy down to standoff distance, then nudge it away from
    /// nearby fleets so they don't visually stack.
    pub(super) fn compute_new_position(&mut self, fleet_nr: FleetIndex, env: &dyn Environment, vis: &mut dyn Visualizer) {
        self.fleet_status[fleet_nr.0].new_position = (self.fleet_status[fleet_nr.0].x, self.fleet_status[fleet_nr.0].y);

        if !self.fleet_status[fleet_nr.0].alive {
            return;
        }

        if let Some(enemy) = self.fleet_status[fleet_nr.0].enemy {
            if !self.unit_status[enemy.0].alive {
                self.choose_enemy(fleet_nr, env, vis);
            }
        }

        let first_ship = self.fleets[fleet_nr.0].first_ship_index;
        let sod = self.unit_config[first_ship].standoff_distance;

        if let Some(enemy) = self.fleet_status[fleet_nr.0].enemy {
            let enemy_fleet = self.units[enemy.0].fleet.expect("ship without a fleet");
            let target = self.fleet_position(enemy_fleet);
            let here = self.fleet_position(fleet_nr);
            let dist = here.distance_to(&target);
            if dist > 0.0 {
                let mut nd = dist - self.fleets[fleet_nr.0].speed as f64;
                if nd < sod as f64 {
                    nd = sod as f64;
                }
                if nd < dist {
                    let nx = target.x + round_to_int((here.x - target.x) as f64 * nd / dist);
                    let ny = target.y + round_to_int((here.y - target.y) as f64 * nd / dist);
                    self.fleet_status[fleet_nr.0].new_position = (nx, ny);
                }
            }
        }

        // "Bouncing": physically nonsensical (it's not a force, just a
        // post-hoc nudge), but keeps stacked fleets from overlapping visually.
        let speed = 0.75_f64;
        let mut bvx = 0i32;
        let mut bvy = 0i32;
        let mut bvdivi = 0.0_f64;
        let player = self.fleets[fleet_nr.0].player;
        let (npx, npy) = self.fleet_status[fleet_nr.0].new_position;

        for ff in 0..self.fleets.len() {
            if ff == fleet_nr.0 || !self.fleet_status[ff].alive {
                continue;
            }
            let idist = Position::new(self.fleet_status[ff].x, self.fleet_status[ff].y, 0).distance_to(&Position::new(npx, npy, 0));
            let their_player = self.fleets[ff].player;
            let threshold = if player == their_player { 4.0 * idist } else { 2.0 * idist };
            if idist > 10.0 && threshold < sod as f64 {
                bvx += npx - self.fleet_status[ff].x;
                bvy += npy - self.fleet_status[ff].y;
                bvdivi += idist;
            }
        }

        if bvx != 0 || bvy != 0 {
            let fleet_speed = self.fleets[fleet_nr.0].speed as f64;
            let nx = round_to_int(npx as f64 + bvx as f64 * speed * fleet_speed / bvdivi);
            let ny = round_to_int(npy as f64 + bvy as f64 * speed * fleet_speed / bvdivi);
            self.fleet_status[fleet_nr.0].new_position = (nx, ny);
        }
    }
}
