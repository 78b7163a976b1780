//! The `Environment` trait: read-only access to host-side rule configuration
//! and weapon tables. Care is taken to keep every environment access behind
//! this boundary so the simulator core stays independent of any particular
//! host's configuration representation.

use serde::{Deserialize, Serialize};

use crate::definitions::FLAK_NUM_OWNERS;

const NUM_OWNERS: usize = FLAK_NUM_OWNERS as usize;

/// Scalar (not per-player) configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarOption {
    AllowAlternativeCombat,
    FireOnAttackFighters,
    StandoffDistance,
}

/// Per-player configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOption {
    BayLaunchInterval,
    BeamFiringRange,
    BeamHitShipCharge,
    FighterFiringRange,
    FighterKillOdds,
    ShipMovementSpeed,
    TorpFiringRange,
}

/// Per-player, per-experience-level configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceOption {
    BayRechargeBonus,
    BayRechargeRate,
    BeamHitBonus,
    BeamHitFighterCharge,
    BeamHitOdds,
    BeamRechargeBonus,
    BeamRechargeRate,
    CrewKillScaling,
    FighterBeamExplosive,
    FighterBeamKill,
    FighterMovementSpeed,
    HullDamageScaling,
    ShieldDamageScaling,
    ShieldKillScaling,
    StrikesPerFighter,
    TorpHitBonus,
    TorpHitOdds,
    TubeRechargeBonus,
    TubeRechargeRate,
}

/// Host-supplied rule configuration and weapon tables. The simulator never
/// mutates or caches values across ticks beyond what `UnitConfig` captures
/// at construction time, so an `Environment` only needs to answer reads.
pub trait Environment {
    fn get_configuration(&self, option: ScalarOption) -> i32;
    fn get_configuration_for_player(&self, option: ArrayOption, player: i32) -> i32;
    fn get_experience_configuration(&self, option: ExperienceOption, level: i32, player: i32) -> i32;

    fn get_beam_kill_power(&self, beam_type: i32) -> i32;
    fn get_beam_damage_power(&self, beam_type: i32) -> i32;
    fn get_torpedo_kill_power(&self, torpedo_type: i32) -> i32;
    fn get_torpedo_damage_power(&self, torpedo_type: i32) -> i32;

    /// Race number in 1..11. The simulator special-cases race 2 ("Lizard",
    /// higher damage survival limit) and race 5 ("Privateer", beam kill x3).
    fn get_player_race_number(&self, player: i32) -> i32;
}

/// Per-player-experience-level table of the 19 `ExperienceOption` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceLevelTable {
    pub bay_recharge_bonus: [i32; NUM_OWNERS],
    pub bay_recharge_rate: [i32; NUM_OWNERS],
    pub beam_hit_bonus: [i32; NUM_OWNERS],
    pub beam_hit_fighter_charge: [i32; NUM_OWNERS],
    pub beam_hit_odds: [i32; NUM_OWNERS],
    pub beam_recharge_bonus: [i32; NUM_OWNERS],
    pub beam_recharge_rate: [i32; NUM_OWNERS],
    pub crew_kill_scaling: [i32; NUM_OWNERS],
    pub fighter_beam_explosive: [i32; NUM_OWNERS],
    pub fighter_beam_kill: [i32; NUM_OWNERS],
    pub fighter_movement_speed: [i32; NUM_OWNERS],
    pub hull_damage_scaling: [i32; NUM_OWNERS],
    pub shield_damage_scaling: [i32; NUM_OWNERS],
    pub shield_kill_scaling: [i32; NUM_OWNERS],
    pub strikes_per_fighter: [i32; NUM_OWNERS],
    pub torp_hit_bonus: [i32; NUM_OWNERS],
    pub torp_hit_odds: [i32; NUM_OWNERS],
    pub tube_recharge_bonus: [i32; NUM_OWNERS],
    pub tube_recharge_rate: [i32; NUM_OWNERS],
}

impl ExperienceLevelTable {
    fn get(&self, option: ExperienceOption, player: i32) -> i32 {
        let p = player_slot(player);
        match option {
            ExperienceOption::BayRechargeBonus => self.bay_recharge_bonus[p],
            ExperienceOption::BayRechargeRate => self.bay_recharge_rate[p],
            ExperienceOption::BeamHitBonus => self.beam_hit_bonus[p],
            ExperienceOption::BeamHitFighterCharge => self.beam_hit_fighter_charge[p],
            ExperienceOption::BeamHitOdds => self.beam_hit_odds[p],
            ExperienceOption::BeamRechargeBonus => self.beam_recharge_bonus[p],
            ExperienceOption::BeamRechargeRate => self.beam_recharge_rate[p],
            ExperienceOption::CrewKillScaling => self.crew_kill_scaling[p],
            ExperienceOption::FighterBeamExplosive => self.fighter_beam_explosive[p],
            ExperienceOption::FighterBeamKill => self.fighter_beam_kill[p],
            ExperienceOption::FighterMovementSpeed => self.fighter_movement_speed[p],
            ExperienceOption::HullDamageScaling => self.hull_damage_scaling[p],
            ExperienceOption::ShieldDamageScaling => self.shield_damage_scaling[p],
            ExperienceOption::ShieldKillScaling => self.shield_kill_scaling[p],
            ExperienceOption::StrikesPerFighter => self.strikes_per_fighter[p],
            ExperienceOption::TorpHitBonus => self.torp_hit_bonus[p],
            ExperienceOption::TorpHitOdds => self.torp_hit_odds[p],
            ExperienceOption::TubeRechargeBonus => self.tube_recharge_bonus[p],
            ExperienceOption::TubeRechargeRate => self.tube_recharge_rate[p],
        }
    }
}

fn player_slot(player: i32) -> usize {
    let p = (player - 1).max(0) as usize;
    p.min(NUM_OWNERS - 1)
}

/// A self-contained, JSON-serializable `Environment`: every table is a flat
/// array rather than a map, since `serde_json` cannot serialize maps keyed by
/// enum variants. This is what `run_battle` deserializes from its caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticEnvironment {
    pub allow_alternative_combat: i32,
    pub fire_on_attack_fighters: i32,
    pub standoff_distance: i32,

    pub bay_launch_interval: [i32; NUM_OWNERS],
    pub beam_firing_range: [i32; NUM_OWNERS],
    pub beam_hit_ship_charge: [i32; NUM_OWNERS],
    pub fighter_firing_range: [i32; NUM_OWNERS],
    pub fighter_kill_odds: [i32; NUM_OWNERS],
    pub ship_movement_speed: [i32; NUM_OWNERS],
    pub torp_firing_range: [i32; NUM_OWNERS],

    /// Indexed by experience level, 0-based.
    pub experience_levels: Vec<ExperienceLevelTable>,

    /// Indexed by weapon type, 1-based (slot 0 unused).
    pub beam_kill_power: Vec<i32>,
    pub beam_damage_power: Vec<i32>,
    pub torpedo_kill_power: Vec<i32>,
    pub torpedo_damage_power: Vec<i32>,

    pub player_race_number: [i32; NUM_OWNERS],
}

impl Environment for StaticEnvironment {
    fn get_configuration(&self, option: ScalarOption) -> i32 {
        match option {
            ScalarOption::AllowAlternativeCombat => self.allow_alternative_combat,
            ScalarOption::FireOnAttackFighters => self.fire_on_attack_fighters,
            ScalarOption::StandoffDistance => self.standoff_distance,
        }
    }

    fn get_configuration_for_player(&self, option: ArrayOption, player: i32) -> i32 {
        let p = player_slot(player);
        match option {
            ArrayOption::BayLaunchInterval => self.bay_launch_interval[p],
            ArrayOption::BeamFiringRange => self.beam_firing_range[p],
            ArrayOption::BeamHitShipCharge => self.beam_hit_ship_charge[p],
            ArrayOption::FighterFiringRange => self.fighter_firing_range[p],
            ArrayOption::FighterKillOdds => self.fighter_kill_odds[p],
            ArrayOption::ShipMovementSpeed => self.ship_movement_speed[p],
            ArrayOption::TorpFiringRange => self.torp_firing_range[p],
        }
    }

    fn get_experience_configuration(&self, option: ExperienceOption, level: i32, player: i32) -> i32 {
        let level = level.max(0) as usize;
        match self.experience_levels.get(level).or_else(|| self.experience_levels.first()) {
            Some(table) => table.get(option, player),
            None => 0,
        }
    }

    fn get_beam_kill_power(&self, beam_type: i32) -> i32 {
        self.beam_kill_power.get(beam_type as usize).copied().unwrap_or(0)
    }

    fn get_beam_damage_power(&self, beam_type: i32) -> i32 {
        self.beam_damage_power.get(beam_type as usize).copied().unwrap_or(0)
    }

    fn get_torpedo_kill_power(&self, torpedo_type: i32) -> i32 {
        self.torpedo_kill_power.get(torpedo_type as usize).copied().unwrap_or(0)
    }

    fn get_torpedo_damage_power(&self, torpedo_type: i32) -> i32 {
        self.torpedo_damage_power.get(torpedo_type as usize).copied().unwrap_or(0)
    }

    fn get_player_race_number(&self, player: i32) -> i32 {
        self.player_race_number[player_slot(player)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StaticEnvironment {
        StaticEnvironment {
            allow_alternative_combat: 0,
            fire_on_attack_fighters: 0,
            standoff_distance: 3000,
            bay_launch_interval: [3; NUM_OWNERS],
            beam_firing_range: [30000; NUM_OWNERS],
            beam_hit_ship_charge: [100; NUM_OWNERS],
            fighter_firing_range: [3000; NUM_OWNERS],
            fighter_kill_odds: [20; NUM_OWNERS],
            ship_movement_speed: [4; NUM_OWNERS],
            torp_firing_range: [30000; NUM_OWNERS],
            experience_levels: vec![ExperienceLevelTable {
                bay_recharge_bonus: [0; NUM_OWNERS],
                bay_recharge_rate: [100; NUM_OWNERS],
                beam_hit_bonus: [0; NUM_OWNERS],
                beam_hit_fighter_charge: [100; NUM_OWNERS],
                beam_hit_odds: [100; NUM_OWNERS],
                beam_recharge_bonus: [0; NUM_OWNERS],
                beam_recharge_rate: [100; NUM_OWNERS],
                crew_kill_scaling: [30; NUM_OWNERS],
                fighter_beam_explosive: [3; NUM_OWNERS],
                fighter_beam_kill: [3; NUM_OWNERS],
                fighter_movement_speed: [300; NUM_OWNERS],
                hull_damage_scaling: [10; NUM_OWNERS],
                shield_damage_scaling: [10; NUM_OWNERS],
                shield_kill_scaling: [10; NUM_OWNERS],
                strikes_per_fighter: [1; NUM_OWNERS],
                torp_hit_bonus: [0; NUM_OWNERS],
                torp_hit_odds: [65; NUM_OWNERS],
                tube_recharge_bonus: [0; NUM_OWNERS],
                tube_recharge_rate: [100; NUM_OWNERS],
            }],
            beam_kill_power: vec![0, 3],
            beam_damage_power: vec![0, 4],
            torpedo_kill_power: vec![0, 4],
            torpedo_damage_power: vec![0, 4],
            player_race_number: [1; NUM_OWNERS],
        }
    }

    #[test]
    fn player_slot_clamps_out_of_range_players() {
        assert_eq!(player_slot(0), 0);
        assert_eq!(player_slot(1), 0);
        assert_eq!(player_slot(12), 11);
        assert_eq!(player_slot(999), 11);
    }

    #[test]
    fn experience_lookup_falls_back_to_first_level_when_out_of_range() {
        let env = sample();
        assert_eq!(env.get_experience_configuration(ExperienceOption::TorpHitOdds, 0, 1), 65);
        assert_eq!(env.get_experience_configuration(ExperienceOption::TorpHitOdds, 5, 1), 65);
    }

    #[test]
    fn weapon_tables_default_to_zero_for_unknown_types() {
        let env = sample();
        assert_eq!(env.get_beam_kill_power(1), 3);
        assert_eq!(env.get_beam_kill_power(99), 0);
    }

    #[test]
    fn scalar_and_array_lookups_round_trip() {
        let env = sample();
        assert_eq!(env.get_configuration(ScalarOption::StandoffDistance), 3000);
        assert_eq!(env.get_configuration_for_player(ArrayOption::ShipMovementSpeed, 3), 4);
        assert_eq!(env.get_player_race_number(2), 1);
    }
}
