//! Enemy selection: every `FLAK_CHOOSE_ENEMY_TIME` ticks (and once at battle
//! start, and whenever a fleet's current enemy dies) each fleet re-scores
//! every unit on its attack list and picks the cheapest one to keep hitting.

use super::Algorithm;
use crate::definitions::*;
use crate::environment::Environment;
use crate::fleet::FleetIndex;
use crate::unit::UnitIndex;
use crate::visualizer::Visualizer;

/// Whether `we` still has a weapon that can meaningfully hurt `they`: beams
/// and launchers with nonzero kill power don't count against an enemy
/// they're useless on, and a death-ray-only ship can't touch a planet with no
/// fighters to shoot down.
fn can_still_attack(algo: &Algorithm, we: UnitIndex, they: UnitIndex, env: &dyn Environment) -> bool {
    let we_data = &algo.units[we.0];
    let they_data = &algo.units[they.0];
    let they_status = &algo.unit_status[they.0];

    let mut torpc = we_data.num_launchers;
    let mut beamc = we_data.num_beams;

    if they_data.is_planet {
        if torpc != 0 && env.get_torpedo_damage_power(we_data.torpedo_type) == 0 {
            torpc = 0;
        }
        if beamc != 0 && env.get_beam_damage_power(we_data.beam_type) == 0 && they_status.fighters_remaining == 0 && they_status.fighters_in_flight == 0 {
            beamc = 0;
        }
    }

    let we_status = &algo.unit_status[we.0];
    beamc != 0
        || (torpc != 0 && we_status.torpedoes != 0)
        || (we_data.num_bays != 0 && (we_status.fighters_remaining != 0 || we_status.fighters_in_flight != 0))
}

impl Algorithm {
    /// Re-scores `fleet_nr`'s attack list and updates its enemy in place.
    /// Emits `set_enemy` only when the choice actually changes.
    pub(super) fn choose_enemy(&mut self, fleet_nr: FleetIndex, env: &dyn Environment, vis: &mut dyn Visualizer) {
        if !self.fleet_status[fleet_nr.0].alive {
            return;
        }

        let mut best_diff = i32::MAX;
        let mut best_choice: Option<UnitIndex> = None;

        let attack_list = self.fleets[fleet_nr.0].attack_list.clone();
        for entry in &attack_list {
            let their = entry.target;
            if self.units[their.0].owner == self.fleets[fleet_nr.0].player {
                continue;
            }
            if !self.unit_status[their.0].alive {
                continue;
            }

            let mut attack_rating: i32 = 0;
            for n in self.fleets[fleet_nr.0].ship_range() {
                let we = UnitIndex(n);
                if self.unit_status[n].alive && (can_still_attack(self, we, their, env) || can_still_attack(self, their, we, env)) {
                    attack_rating += self.units[n].rating;
                }
            }
            if attack_rating == 0 {
                continue;
            }

            let their_rating = self.units[their.0].rating;
            let (mut diff, mut divisor) = if attack_rating < their_rating {
                (their_rating - attack_rating + FLAK_DIFF_OFFSET, FLAK_DIVISOR_IF_SMALLER)
            } else {
                (attack_rating - their_rating + FLAK_DIFF_OFFSET, FLAK_DIVISOR_IF_BIGGER)
            };

            divisor += entry.rating_bonus as i32;
            if Some(their) == self.fleet_status[fleet_nr.0].enemy {
                divisor += FLAK_DIVISOR_SAME_ENEMY_BONUS;
            }
            if self.unit_status[their.0].damage > 0.0 {
                divisor += self.unit_status[their.0].damage as i32;
            }
            divisor += (100 - self.unit_status[their.0].shield as i32) / 5;

            let fleet_pos = self.fleet_position(fleet_nr);
            let their_fleet = self.units[their.0].fleet.expect("ship without a fleet");
            let their_pos = self.fleet_position(their_fleet);
            let dist = fleet_pos.distance_to(&their_pos);
            let speed = self.fleets[fleet_nr.0].speed;
            let mut multiplier = if speed <= 0 { (dist / 100.0) as i32 } else { (dist / speed as f64) as i32 };
            if multiplier < FLAK_MULTIPLIER_MIN {
                multiplier = FLAK_MULTIPLIER_MIN;
            }

            diff = diff * multiplier / divisor;
            if diff < best_diff {
                best_diff = diff;
                best_choice = Some(their);
            }
        }

        if best_choice != self.fleet_status[fleet_nr.0].enemy {
            vis.set_enemy(fleet_nr, best_choice);
        }
        self.fleet_status[fleet_nr.0].enemy = best_choice;

        if let Some(enemy) = best_choice {
            let mut num_torpers = 0;
            for i in self.fleets[fleet_nr.0].ship_range() {
                if self.unit_status[i].alive && self.units[i].num_launchers != 0 && self.unit_status[i].torpedoes >= 10 {
                    num_torpers += 1;
                }
            }
            for i in self.fleets[fleet_nr.0].ship_range() {
                self.compute_torp_limit(UnitIndex(i), enemy, num_torpers, env);
            }
        }
    }
}
