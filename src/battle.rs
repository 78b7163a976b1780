//! The `Battle` façade: wraps a `Setup` and plays it to completion exactly
//! once, caching the final per-unit outcome so repeated queries don't replay
//! the fight. This is the entry point a host embeds instead of driving
//! `Algorithm` directly.
//!
//! Score and experience accounting (who gets how many points for a kill or a
//! capture) lives entirely on the host side and has no counterpart here.

use serde::{Deserialize, Serialize};

use crate::algorithm::{round_half_up, Algorithm};
use crate::environment::Environment;
use crate::null_visualizer::NullVisualizer;
use crate::rng::CaptorRng;
use crate::setup::Setup;
use crate::unit::UnitIndex;

/// Final state of one unit after a battle has been played to completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOutcome {
    pub shield: i32,
    pub damage: i32,
    pub crew: i32,
    pub num_torpedoes: i32,
    pub num_fighters: i32,
    /// `0` survived, `-1` destroyed, otherwise the capturing player's number.
    pub ending_status: i32,
}

/// A battle waiting to be, or already, resolved.
pub struct Battle {
    setup: Setup,
    result: Option<Vec<UnitOutcome>>,
}

impl Battle {
    pub fn new(setup: Setup) -> Self {
        Self { setup, result: None }
    }

    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    pub fn num_objects(&self) -> usize {
        self.setup.ships().len()
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// Plays the battle with a `NullVisualizer` sink and snapshots the final
    /// state of every unit. A no-op if already computed, or if the setup has
    /// no fleets to fight with.
    pub fn prepare_result(&mut self, env: &dyn Environment, captor_rng: &mut dyn CaptorRng) {
        if self.result.is_some() {
            return;
        }
        if self.setup.fleets().is_empty() {
            self.result = Some(Vec::new());
            return;
        }

        let mut algo = Algorithm::new(&self.setup, env);
        let mut vis = NullVisualizer;
        algo.init(env, &mut vis);
        while algo.play_cycle(env, &mut vis) {}

        let ending_status = algo.set_ending_status(env, captor_rng);
        let outcomes = (0..algo.num_units())
            .map(|i| {
                let status = algo.unit_status(UnitIndex(i)).expect("index within num_units");
                UnitOutcome {
                    shield: round_half_up(status.shield),
                    damage: round_half_up(status.damage),
                    crew: round_half_up(status.crew),
                    num_torpedoes: status.torpedoes,
                    num_fighters: status.fighters_remaining,
                    ending_status: ending_status[i],
                }
            })
            .collect();
        self.result = Some(outcomes);
    }

    /// The outcome for ship slot `slot`, once `prepare_result` has run.
    pub fn outcome(&self, slot: usize) -> Option<&UnitOutcome> {
        self.result.as_ref()?.get(slot)
    }

    pub fn outcomes(&self) -> Option<&[UnitOutcome]> {
        self.result.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Configuration;
    use crate::environment::{ArrayOption, ExperienceOption, ScalarOption};
    use crate::rng::{Lcg, ThreadCaptorRng};
    use crate::unit::UnitData;

    struct FakeEnv;
    impl Environment for FakeEnv {
        fn get_configuration(&self, option: ScalarOption) -> i32 {
            match option {
                ScalarOption::AllowAlternativeCombat => 1,
                ScalarOption::FireOnAttackFighters => 0,
                ScalarOption::StandoffDistance => 100,
            }
        }
        fn get_configuration_for_player(&self, option: ArrayOption, _player: i32) -> i32 {
            match option {
                ArrayOption::ShipMovementSpeed => 100,
                ArrayOption::TorpFiringRange => 10000,
                ArrayOption::BeamFiringRange => 10000,
                _ => 0,
            }
        }
        fn get_experience_configuration(&self, option: ExperienceOption, _level: i32, _player: i32) -> i32 {
            match option {
                ExperienceOption::TorpHitOdds | ExperienceOption::BeamHitOdds => 100,
                ExperienceOption::ShieldKillScaling
                | ExperienceOption::ShieldDamageScaling
                | ExperienceOption::HullDamageScaling
                | ExperienceOption::CrewKillScaling => 10,
                _ => 0,
            }
        }
        fn get_beam_kill_power(&self, _t: i32) -> i32 {
            10
        }
        fn get_beam_damage_power(&self, _t: i32) -> i32 {
            10
        }
        fn get_torpedo_kill_power(&self, _t: i32) -> i32 {
            10
        }
        fn get_torpedo_damage_power(&self, _t: i32) -> i32 {
            10
        }
        fn get_player_race_number(&self, _player: i32) -> i32 {
            1
        }
    }

    fn warship(owner: i32) -> UnitData {
        UnitData {
            owner,
            mass: 100,
            initial_shield: 100,
            initial_damage: 0,
            initial_crew: 100,
            num_beams: 2,
            beam_type: 4,
            ..Default::default()
        }
    }

    fn two_fleet_setup() -> Setup {
        let config = Configuration::default();
        let mut ship1 = warship(1);
        ship1.init(&config);
        let mut ship2 = warship(2);
        ship2.init(&config);

        let mut setup = Setup::new();
        let f1 = setup.add_fleet(1);
        let s1 = setup.add_ship(ship1).unwrap();
        let f2 = setup.add_fleet(2);
        let s2 = setup.add_ship(ship2).unwrap();
        setup.add_attack_list_entry(f1, s2, 5);
        setup.add_attack_list_entry(f2, s1, 5);

        let mut rng = Lcg::new(7);
        setup.init_after_setup(&config, &FakeEnv, &mut rng).unwrap();
        setup
    }

    #[test]
    fn prepare_result_is_idempotent_and_covers_every_unit() {
        let env = FakeEnv;
        let mut captor_rng = ThreadCaptorRng;
        let mut battle = Battle::new(two_fleet_setup());
        assert!(!battle.has_result());

        battle.prepare_result(&env, &mut captor_rng);
        assert!(battle.has_result());
        let first = battle.outcomes().unwrap().to_vec();
        assert_eq!(first.len(), battle.num_objects());

        battle.prepare_result(&env, &mut captor_rng);
        let second = battle.outcomes().unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn battle_with_no_fleets_resolves_to_an_empty_result() {
        let env = FakeEnv;
        let mut captor_rng = ThreadCaptorRng;
        let mut battle = Battle::new(Setup::new());
        battle.prepare_result(&env, &mut captor_rng);
        assert_eq!(battle.outcomes().unwrap().len(), 0);
    }

    #[test]
    fn destroyed_units_get_a_non_survived_ending_status() {
        let env = FakeEnv;
        let mut captor_rng = ThreadCaptorRng;
        let mut battle = Battle::new(two_fleet_setup());
        battle.prepare_result(&env, &mut captor_rng);

        let any_destroyed = battle.outcomes().unwrap().iter().any(|o| o.ending_status != 0);
        assert!(any_destroyed);
    }
}
