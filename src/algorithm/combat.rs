//! Damage formulas and their application to a unit, plus the torpedo launch
//! limiter that throttles a fleet's tubes once it has more firepower aimed at
//! an enemy than it needs to kill it.

use super::Algorithm;
use crate::definitions::*;
use crate::environment::Environment;
use crate::unit::{UnitConfig, UnitIndex};

/// `ShieldKillScaling*kill + ShieldDamageScaling*expl`, scaled by mass,
/// rounded up under non-alternative combat.
pub(super) fn compute_shield_damage(expl: i32, kill: i32, mass: i32, config: &UnitConfig) -> f64 {
    let damage = (config.shield_kill_scaling as f64 * kill as f64 + config.shield_damage_scaling as f64 * expl as f64) / (mass as f64 + 1.0);
    if damage > 10000.0 {
        10000.0
    } else if config.allow_alternative_combat {
        damage
    } else {
        super::round_up_half(damage) as f64
    }
}

/// Alternative combat scales `expl` directly by `HullDamageScaling`; the
/// classic rules scale the already-computed shield damage instead.
pub(super) fn compute_hull_damage(expl: i32, kill: i32, mass: i32, config: &UnitConfig) -> f64 {
    if config.allow_alternative_combat {
        let d = expl as f64 * config.hull_damage_scaling as f64 / (mass as f64 + 1.0);
        if d > 10000.0 {
            10000.0
        } else {
            d
        }
    } else {
        let d = compute_shield_damage(expl, kill, mass, config) * config.hull_damage_scaling as f64 / (mass as f64 + 1.0);
        if d > 10000.0 {
            10000.0
        } else {
            super::round_up_half(d) as f64
        }
    }
}

/// `death_flag == 0` marks a death ray: under non-alternative combat a death
/// ray always kills at least one crewman even if the scaled formula rounds to
/// zero; any other weapon may legitimately kill nobody.
pub(super) fn compute_crew_killed(kill: i32, mass: i32, death_flag: i32, config: &UnitConfig) -> f64 {
    let d = kill as f64 * config.crew_kill_scaling as f64 / (mass as f64 + 1.0);
    if config.allow_alternative_combat {
        d
    } else {
        let killed = super::round_half_up(d);
        if killed == 0 && death_flag == 0 {
            1.0
        } else {
            killed as f64
        }
    }
}

impl Algorithm {
    /// Applies one weapon hit to `target`, fired by `firing_ship`. `expl`/`kill`
    /// are the weapon's damage/kill parameters; `death_flag == 0` marks a death
    /// ray, which skips shields and hull entirely and always damages crew.
    pub(super) fn hit_ship_with(&mut self, target: UnitIndex, firing_ship: UnitIndex, mut expl: i32, mut kill: i32, death_flag: i32) {
        let target_owner = self.units[target.0].owner;
        let firing_owner = self.units[firing_ship.0].owner;
        let att_idx = (firing_owner - 1) as usize;
        let opp_idx = (target_owner - 1) as usize;
        let att_count = self.players[att_idx].num_live_units;
        let opp_count = self.players[opp_idx].num_live_units;
        let att_strength = self.players[att_idx].sum_strength;
        let opp_strength = self.players[opp_idx].sum_strength;

        let mass = self.units[target.0].mass;
        let eff_mass = if att_count < opp_count && att_strength < opp_strength {
            if (att_strength + FLAK_COMPENSATION_DIVISOR) * FLAK_COMPENSATION_LIMIT < (opp_strength + FLAK_COMPENSATION_DIVISOR) {
                mass / FLAK_COMPENSATION_LIMIT
            } else {
                mass * (att_strength + FLAK_COMPENSATION_DIVISOR) / (opp_strength + FLAK_COMPENSATION_DIVISOR)
            }
        } else {
            mass
        };

        if kill <= 0 {
            kill = 1;
        }
        if expl <= 0 {
            expl = 1;
        }

        let is_planet = self.units[target.0].is_planet;
        let config = self.unit_config[target.0];

        // damage_rate stays at its death-ray default of 1.0 unless the
        // shield/hull branch below runs and changes it.
        let mut damage_rate = 1.0_f64;
        let mut apply_crew_damage = true;

        if death_flag != 0 {
            if self.unit_status[target.0].shield > 0.0 {
                let damage = compute_shield_damage(expl, kill, eff_mass, &config);
                if self.unit_status[target.0].shield <= damage {
                    damage_rate = (damage - self.unit_status[target.0].shield) / damage;
                    self.unit_status[target.0].shield = 0.0;
                } else {
                    damage_rate = 0.0;
                    self.unit_status[target.0].shield -= damage;
                }
            }

            if damage_rate <= 0.0 {
                apply_crew_damage = false;
            } else {
                self.unit_status[target.0].damage += compute_hull_damage(expl, kill, eff_mass, &config) * damage_rate;
                if self.unit_status[target.0].damage > 9999.0 {
                    self.unit_status[target.0].damage = 9999.0;
                }
            }
        }

        if apply_crew_damage && !is_planet {
            self.unit_status[target.0].crew -= compute_crew_killed(kill, eff_mass, death_flag, &config) * damage_rate;
            if self.unit_status[target.0].crew < 0.5 {
                self.unit_status[target.0].crew = 0.0;
            }
        }

        if self.unit_status[target.0].alive {
            self.unit_status[target.0].last_hit_by = Some(firing_ship);
        }
    }

    /// Recomputes `attacker`'s torpedo launch limit against `enemy`: once a
    /// fleet's torpedo tubes can already guarantee the kill, throttling the
    /// rest preserves ammunition for the next target.
    pub(super) fn compute_torp_limit(&mut self, attacker: UnitIndex, enemy: UnitIndex, num_torpers: i32, env: &dyn Environment) {
        self.unit_status[attacker.0].torp_launch_limit = self.units[attacker.0].num_launchers;

        if self.units[attacker.0].num_launchers <= 2 || self.unit_config[attacker.0].torp_hit_odds <= 0 {
            return;
        }

        let mut expl = env.get_torpedo_damage_power(self.units[attacker.0].torpedo_type);
        let mut kill = env.get_torpedo_kill_power(self.units[attacker.0].torpedo_type);
        if !self.alternative_combat {
            expl *= 2;
            kill *= 2;
        }

        let enemy_mass = self.units[enemy.0].mass;
        let enemy_config = self.unit_config[enemy.0];
        let cd = compute_crew_killed(kill, enemy_mass, expl, &enemy_config);

        let torps_reqd = if expl == 0 {
            // Death ray: no hull/shield damage, so the only path to a kill is
            // crew attrition. A planet has no crew to kill this way.
            if self.units[enemy.0].is_planet {
                return;
            }
            let crew = self.unit_status[enemy.0].crew;
            (1.0 + (crew / cd) * FLAK_TORP_LIMIT_FACTOR as f64 / self.unit_config[attacker.0].torp_hit_odds as f64) as i32
        } else {
            let hd = compute_hull_damage(expl, kill, enemy_mass, &enemy_config);
            let sd = compute_shield_damage(expl, kill, enemy_mass, &enemy_config);

            let limit = if env.get_player_race_number(self.units[enemy.0].owner) == FLAK_RACE_LIZARD { 151.0 } else { 100.0 };
            let mut v1 = (limit - self.unit_status[enemy.0].damage) / (hd + 0.01);
            if !self.units[enemy.0].is_planet {
                let v2 = self.unit_status[enemy.0].crew / (cd + 0.01);
                if v1 > v2 {
                    v1 = v2;
                }
            }
            (1.0 + (self.unit_status[enemy.0].shield / sd + v1) * FLAK_TORP_LIMIT_FACTOR as f64 / self.unit_config[attacker.0].torp_hit_odds as f64) as i32
        };

        let torps_reqd = if num_torpers != 0 { (torps_reqd + num_torpers - 1) / num_torpers } else { torps_reqd };

        if torps_reqd < self.units[attacker.0].num_launchers {
            self.unit_status[attacker.0].torp_launch_limit = torps_reqd;
        }
    }
}
