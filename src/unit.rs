//! A "unit" is a ship or a planet; the simulator calls both "ship". Each unit
//! is split into three parts with distinct lifecycles: immutable `UnitData`,
//! immutable-after-construction `UnitConfig` (derived from data + environment),
//! and mutable per-tick `UnitStatus`.

use serde::{Deserialize, Serialize};

use crate::definitions::*;
use crate::environment::{ArrayOption, Environment, ExperienceOption, ScalarOption};
use crate::fleet::FleetIndex;

/// Dense index into the simulator's unit array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitIndex(pub usize);

/// Immutable for the whole battle; supplied by the Setup builder.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UnitData {
    pub id: i32,
    pub owner: i32,
    pub is_planet: bool,
    pub name: String,
    pub mass: i32,
    pub rating: i32,
    pub compensation: i32,
    pub initial_shield: i32,
    pub initial_damage: i32,
    pub initial_crew: i32,
    pub num_beams: i32,
    pub beam_type: i32,
    pub num_launchers: i32,
    pub torpedo_type: i32,
    pub num_torpedoes: i32,
    pub num_bays: i32,
    pub num_fighters: i32,
    pub max_fighters_launched: i32,
    pub experience_level: i32,
    pub fleet: Option<FleetIndex>,
}

impl UnitData {
    /// Computes `rating`, `compensation`, and `max_fighters_launched` from
    /// the setup-time `Configuration`. Must run once before the unit enters
    /// a battle.
    pub fn init(&mut self, config: &crate::configuration::Configuration) {
        let mut mfl = FLAK_MFL_SCALE * self.num_bays;
        if mfl < FLAK_MINIMUM_MFL {
            mfl = FLAK_MINIMUM_MFL;
        }
        if mfl > FLAK_MAXIMUM_MFL {
            mfl = FLAK_MAXIMUM_MFL;
        }
        self.max_fighters_launched = mfl;

        self.rating = self.mass * config.rating_mass_scale
            + self.num_launchers * self.torpedo_type * config.rating_torp_scale
            + self.num_beams * self.beam_type * config.rating_beam_scale
            + self.num_bays * config.rating_bay_scale;

        let strength = config.compensation_ship_scale
            + self.num_launchers * config.compensation_torp_scale
            + self.num_beams * config.compensation_beam_scale
            + self.num_bays * config.compensation_fighter_scale
            + self.mass * config.compensation_mass100_kt_scale / 100;
        self.compensation = strength.clamp(0, config.compensation_limit);
    }
}

/// Derived from `UnitData` + `Environment` at construction; constant for the
/// rest of the battle.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitConfig {
    pub bay_recharge_rate: i32,
    pub beam_recharge_rate: i32,
    pub tube_recharge_rate: i32,
    pub beam_hit_odds: i32,
    pub torp_hit_odds: i32,
    pub shield_kill_scaling: i32,
    pub shield_damage_scaling: i32,
    pub hull_damage_scaling: i32,
    pub crew_kill_scaling: i32,
    pub beam_firing_range: i32,
    pub beam_hit_ship_charge: i32,
    pub beam_hit_fighter_charge: i32,
    pub torp_firing_range: i32,
    pub fighter_firing_range: i32,
    pub fighter_movement_speed: i32,
    pub strikes_per_fighter: i32,
    pub fighter_beam_kill: i32,
    pub fighter_beam_explosive: i32,
    pub bay_launch_interval: i32,
    pub standoff_distance: i32,
    pub fire_on_attack_fighters: bool,
    pub fighter_kill_odds: i32,
    pub allow_alternative_combat: bool,
}

impl UnitConfig {
    /// `smash` (kill power + damage power of a ship's own weapon) scales the
    /// recharge/hit-odds bonus terms below — a ship with a weak weapon gets
    /// less benefit from a high *Bonus experience setting than one with a
    /// devastating one.
    pub fn build(data: &UnitData, env: &dyn Environment) -> Self {
        let player = data.owner;
        let level = data.experience_level;
        let exp = |opt: ExperienceOption, min: i32, max: i32| env.get_experience_configuration(opt, level, player).clamp(min, max);

        let beam_smash = env.get_beam_kill_power(data.beam_type) + env.get_beam_damage_power(data.beam_type);
        let torp_smash = env.get_torpedo_kill_power(data.torpedo_type) + env.get_torpedo_damage_power(data.torpedo_type);

        let bay_recharge_rate = (exp(ExperienceOption::BayRechargeRate, 0, 16384) + data.num_bays * exp(ExperienceOption::BayRechargeBonus, -500, 500)).max(1);

        let (beam_recharge_rate, beam_hit_odds, beam_hit_fighter_charge) = if data.num_beams != 0 {
            (
                (exp(ExperienceOption::BeamRechargeRate, 0, 16384) + beam_smash * exp(ExperienceOption::BeamRechargeBonus, -4095, 4095) / 100).max(1),
                (exp(ExperienceOption::BeamHitOdds, 0, 100) + beam_smash * exp(ExperienceOption::BeamHitBonus, -4095, 4095) / 100).max(0),
                exp(ExperienceOption::BeamHitFighterCharge, 0, 1000),
            )
        } else {
            (0, 0, 0)
        };

        let (tube_recharge_rate, torp_hit_odds) = if data.num_launchers != 0 {
            (
                (exp(ExperienceOption::TubeRechargeRate, 0, 16384) + torp_smash * exp(ExperienceOption::TubeRechargeBonus, -4095, 4095) / 100).max(1),
                (exp(ExperienceOption::TorpHitOdds, 0, 100) + torp_smash * exp(ExperienceOption::TorpHitBonus, -4095, 4095) / 100).max(0),
            )
        } else {
            (0, 0)
        };

        Self {
            bay_recharge_rate,
            beam_recharge_rate,
            tube_recharge_rate,
            beam_hit_odds,
            torp_hit_odds,
            shield_kill_scaling: exp(ExperienceOption::ShieldKillScaling, 0, 32767),
            shield_damage_scaling: exp(ExperienceOption::ShieldDamageScaling, 0, 32767),
            hull_damage_scaling: exp(ExperienceOption::HullDamageScaling, 0, 32767),
            crew_kill_scaling: exp(ExperienceOption::CrewKillScaling, 0, 32767),
            beam_firing_range: env.get_configuration_for_player(ArrayOption::BeamFiringRange, player),
            beam_hit_ship_charge: env.get_configuration_for_player(ArrayOption::BeamHitShipCharge, player),
            beam_hit_fighter_charge,
            torp_firing_range: env.get_configuration_for_player(ArrayOption::TorpFiringRange, player),
            fighter_firing_range: env.get_configuration_for_player(ArrayOption::FighterFiringRange, player),
            fighter_movement_speed: exp(ExperienceOption::FighterMovementSpeed, 1, 10000),
            strikes_per_fighter: exp(ExperienceOption::StrikesPerFighter, 1, 100),
            fighter_beam_kill: exp(ExperienceOption::FighterBeamKill, 1, 1000),
            fighter_beam_explosive: exp(ExperienceOption::FighterBeamExplosive, 1, 1000),
            bay_launch_interval: env.get_configuration_for_player(ArrayOption::BayLaunchInterval, player),
            standoff_distance: env.get_configuration(ScalarOption::StandoffDistance),
            fire_on_attack_fighters: env.get_configuration(ScalarOption::FireOnAttackFighters) != 0,
            fighter_kill_odds: env.get_configuration_for_player(ArrayOption::FighterKillOdds, player),
            allow_alternative_combat: env.get_configuration(ScalarOption::AllowAlternativeCombat) != 0,
        }
    }
}

/// Mutable per-tick state of a unit.
#[derive(Debug, Clone)]
pub struct UnitStatus {
    pub shield: f64,
    pub damage: f64,
    pub crew: f64,
    pub alive: bool,
    pub last_hit_by: Option<UnitIndex>,

    pub beam_charge: Vec<i32>,
    pub tube_charge: Vec<i32>,
    pub bay_charge: Vec<i32>,

    pub torp_launch_limit: i32,
    pub launch_countdown: i32,
    pub fighters_in_flight: i32,
    pub fighters_remaining: i32,
    pub torpedoes: i32,
    pub received_torpedoes: i32,

    pub min_fighters_aboard: i32,
    pub torps_hit: i32,

    pub z: i32,
}

impl UnitStatus {
    pub fn new(data: &UnitData) -> Self {
        let start_charge = if data.initial_shield >= 100 { 1000 } else { 0 };
        Self {
            shield: data.initial_shield as f64,
            damage: data.initial_damage as f64,
            crew: data.initial_crew as f64,
            alive: true,
            last_hit_by: None,
            beam_charge: vec![start_charge; data.num_beams.max(0) as usize],
            tube_charge: vec![start_charge; data.num_launchers.max(0) as usize],
            bay_charge: vec![start_charge; data.num_bays.max(0) as usize],
            torp_launch_limit: data.num_launchers,
            launch_countdown: 0,
            fighters_in_flight: 0,
            fighters_remaining: data.num_fighters,
            torpedoes: data.num_torpedoes,
            received_torpedoes: 0,
            min_fighters_aboard: data.num_fighters,
            torps_hit: 0,
            z: 0,
        }
    }
}
