//! The simulator core: owns every mutable Status array, drives the per-tick
//! phase pipeline, and answers the accessor/termination/capture queries the
//! rest of the crate needs. Everything else in this crate exists to feed
//! this module an `(Setup, Environment)` pair and consume what it emits.

mod combat;
mod ending;
mod phases;
mod targeting;

use crate::definitions::*;
use crate::environment::{ArrayOption, Environment, ScalarOption};
use crate::fleet::{FleetData, FleetIndex, FleetStatus};
use crate::player::PlayerStatus;
use crate::position::Position;
use crate::rng::Lcg;
use crate::setup::Setup;
use crate::transient::VisId;
use crate::unit::{UnitConfig, UnitData, UnitIndex, UnitStatus};
use crate::visualizer::{ShipInfo, Visualizer};

pub use ending::StatusToken;

/// Mutable runtime state of a FLAK battle, built from an immutable `Setup`
/// plus an `Environment`. Single-threaded, not reentrant; two instances may
/// run on separate threads as long as they don't share a `Setup` the
/// simulator would mutate (it never does — `Setup` is read-only here).
pub struct Algorithm {
    fleets: Vec<FleetData>,
    fleet_status: Vec<FleetStatus>,
    units: Vec<UnitData>,
    unit_config: Vec<UnitConfig>,
    unit_status: Vec<UnitStatus>,
    players: Vec<PlayerStatus>,
    /// Dense list of player-array indices with at least one living unit at
    /// battle start. Computed once in `init` and never revisited — a player
    /// who loses every unit mid-battle stays in this list (with an empty
    /// object list and zero living units) for the rest of the fight.
    player_index: Vec<usize>,
    rng: Lcg,
    original_seed: u32,
    time: i32,
    terminated: bool,
    alternative_combat: bool,
    fire_on_attack_fighters: bool,
    free_object_ids: Vec<VisId>,
    next_object_id: usize,
}

impl Algorithm {
    /// Builds the runtime arrays from a setup. Does not yet reset Status or
    /// render anything — call [`Algorithm::init`] before the first
    /// [`Algorithm::play_cycle`].
    pub fn new(setup: &Setup, env: &dyn Environment) -> Self {
        let mut units = setup.ships().to_vec();
        let fleets = setup.fleets().to_vec();
        for (f, fleet) in fleets.iter().enumerate() {
            for i in fleet.ship_range() {
                units[i].fleet = Some(FleetIndex(f));
            }
        }

        let unit_config: Vec<UnitConfig> = units.iter().map(|u| UnitConfig::build(u, env)).collect();
        let unit_status: Vec<UnitStatus> = units.iter().map(UnitStatus::new).collect();
        let fleet_status: Vec<FleetStatus> = fleets.iter().map(FleetStatus::new).collect();

        Self {
            fleets,
            fleet_status,
            units,
            unit_config,
            unit_status,
            players: Vec::new(),
            player_index: Vec::new(),
            rng: Lcg::new(setup.seed()),
            original_seed: setup.seed(),
            time: 0,
            terminated: false,
            alternative_combat: env.get_configuration(ScalarOption::AllowAlternativeCombat) != 0,
            fire_on_attack_fighters: env.get_configuration(ScalarOption::FireOnAttackFighters) != 0,
            free_object_ids: Vec::new(),
            next_object_id: 0,
        }
    }

    /// Resets all Status to battle start, builds the player aggregates and
    /// `player_index`, assigns z-offsets, renders the initial `createFleet`
    /// / `createShip` events, and runs one `choose_enemy` pass per fleet.
    pub fn init(&mut self, env: &dyn Environment, vis: &mut dyn Visualizer) {
        self.time = 0;
        self.rng.set_seed(self.original_seed);
        self.terminated = false;

        for i in 0..self.units.len() {
            self.unit_status[i] = UnitStatus::new(&self.units[i]);
        }
        for i in 0..self.fleets.len() {
            self.fleet_status[i] = FleetStatus::new(&self.fleets[i]);
        }

        for fleet in &self.fleets {
            let mut cur_z = -((fleet.num_ships as i32 - 1) * 50);
            for i in fleet.ship_range() {
                self.unit_status[i].z = cur_z;
                cur_z += 100;
            }
        }

        self.players = (1..=FLAK_NUM_OWNERS)
            .map(|p| {
                let odds = env.get_configuration_for_player(ArrayOption::FighterKillOdds, p);
                PlayerStatus::new(p, odds)
            })
            .collect();

        for unit in &self.units {
            let idx = (unit.owner - 1) as usize;
            self.players[idx].num_live_units += 1;
            self.players[idx].sum_strength += unit.compensation;
        }
        self.player_index = (0..self.players.len()).filter(|&i| self.players[i].num_live_units != 0).collect();

        self.free_object_ids.clear();
        self.next_object_id = 0;

        self.render_all(vis);

        for f in 0..self.fleets.len() {
            self.choose_enemy(FleetIndex(f), env, vis);
        }
    }

    /// Advances the battle by one tick: the twelve phases in order, then
    /// time increment, `updateTime`, and the termination check. Returns
    /// `false` without doing anything once the battle has already
    /// terminated.
    pub fn play_cycle(&mut self, env: &dyn Environment, vis: &mut dyn Visualizer) -> bool {
        if self.terminated {
            return false;
        }

        for i in 0..self.units.len() {
            self.recharge_ship(UnitIndex(i));
        }

        if self.time != 0 && self.time % FLAK_CHOOSE_ENEMY_TIME == 0 {
            for f in 0..self.fleets.len() {
                self.choose_enemy(FleetIndex(f), env, vis);
            }
        }

        for f in 0..self.fleets.len() {
            self.launch_fighters(FleetIndex(f), vis);
        }

        for f in 0..self.fleets.len() {
            self.fire_torps(FleetIndex(f), env, vis);
        }

        let pivot_fleet = if self.fleets.is_empty() { 0 } else { self.rng.next(self.fleets.len() as u16) as usize };
        for offset in 0..self.fleets.len() {
            let f = (pivot_fleet + offset) % self.fleets.len();
            self.fire_beams(FleetIndex(f), env, vis);
        }

        let pivot_player = if self.player_index.is_empty() {
            0
        } else {
            self.rng.next(self.player_index.len() as u16) as usize
        };
        for offset in 0..self.player_index.len() {
            let p = self.player_index[(pivot_player + offset) % self.player_index.len()];
            self.fighters_fire(p, vis);
        }

        for i in 0..self.player_index.len() {
            if !self.players[self.player_index[i]].has_ever_had_fighters {
                continue;
            }
            for j in (i + 1)..self.player_index.len() {
                if !self.players[self.player_index[j]].has_ever_had_fighters {
                    continue;
                }
                // fighterIntercept favors a "young" fighter of its first
                // argument firing at an "old" one of its second; swap the
                // roles at random since there's no clean fix for that bias.
                if self.rng.next(2) == 0 {
                    self.fighter_intercept(self.player_index[i], self.player_index[j], vis);
                } else {
                    self.fighter_intercept(self.player_index[j], self.player_index[i], vis);
                }
            }
        }

        for offset in 0..self.player_index.len() {
            let p = self.player_index[(pivot_player + offset) % self.player_index.len()];
            self.move_stuff(p, vis);
        }

        for f in 0..self.fleets.len() {
            self.do_fleet_gc(FleetIndex(f), env, vis);
        }

        for i in 0..self.player_index.len() {
            let p = self.player_index[i];
            self.do_player_gc(p);
        }

        for f in 0..self.fleets.len() {
            self.compute_new_position(FleetIndex(f), env, vis);
        }
        for f in 0..self.fleets.len() {
            let (nx, ny) = self.fleet_status[f].new_position;
            if (nx, ny) != (self.fleet_status[f].x, self.fleet_status[f].y) {
                self.fleet_status[f].x = nx;
                self.fleet_status[f].y = ny;
                vis.move_fleet(FleetIndex(f), nx, ny);
                for k in self.fleets[f].ship_range() {
                    if self.unit_status[k].alive {
                        vis.move_ship(UnitIndex(k), self.ship_position(UnitIndex(k)));
                    }
                }
            }
        }

        self.time += 1;
        vis.update_time(self.time);
        self.terminated = self.end_check();
        true
    }

    fn render_all(&self, vis: &mut dyn Visualizer) {
        for (f, fleet) in self.fleets.iter().enumerate() {
            vis.create_fleet(FleetIndex(f), fleet.initial_x, fleet.initial_y, fleet.player, UnitIndex(fleet.first_ship_index), fleet.num_ships);
        }
        for i in 0..self.units.len() {
            let pos = self.ship_position(UnitIndex(i));
            let info = self.build_ship_info(i);
            vis.create_ship(UnitIndex(i), pos, &info);
        }
    }

    fn build_ship_info(&self, i: usize) -> ShipInfo {
        let data = &self.units[i];
        let status = &self.unit_status[i];
        ShipInfo {
            name: data.name.clone(),
            is_planet: data.is_planet,
            player: data.owner,
            shield: round_half_up(status.shield),
            damage: round_half_up(status.damage),
            crew: round_half_up(status.crew),
            num_beams: data.num_beams,
            num_launchers: data.num_launchers,
            num_torpedoes: status.torpedoes,
            num_bays: data.num_bays,
            num_fighters: status.fighters_remaining,
            torpedo_type: data.torpedo_type,
            beam_type: data.beam_type,
            mass: data.mass,
            id: data.id,
        }
    }

    fn fleet_position(&self, f: FleetIndex) -> Position {
        Position::new(self.fleet_status[f.0].x, self.fleet_status[f.0].y, self.fleet_status[f.0].z)
    }

    fn ship_position(&self, u: UnitIndex) -> Position {
        let f = self.units[u.0].fleet.expect("unit without a fleet");
        Position::new(self.fleet_status[f.0].x, self.fleet_status[f.0].y, self.unit_status[u.0].z)
    }

    fn next_vis_id(&mut self) -> VisId {
        if let Some(id) = self.free_object_ids.pop() {
            id
        } else {
            let id = VisId(self.next_object_id);
            self.next_object_id += 1;
            id
        }
    }

    /*
     *  Accessors. Out-of-range indices return benign defaults, matching the
     *  "never fails" contract of read-only UI-facing queries.
     */

    pub fn get_time(&self) -> i32 {
        self.time
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn num_fleets(&self) -> usize {
        self.fleets.len()
    }

    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    pub fn unit_data(&self, u: UnitIndex) -> Option<&UnitData> {
        self.units.get(u.0)
    }

    pub fn unit_status(&self, u: UnitIndex) -> Option<&UnitStatus> {
        self.unit_status.get(u.0)
    }

    pub fn fleet_data(&self, f: FleetIndex) -> Option<&FleetData> {
        self.fleets.get(f.0)
    }

    pub fn fleet_status(&self, f: FleetIndex) -> Option<&FleetStatus> {
        self.fleet_status.get(f.0)
    }

    pub fn is_unit_alive(&self, u: UnitIndex) -> bool {
        self.unit_status.get(u.0).map_or(false, |s| s.alive)
    }

    pub fn is_fleet_alive(&self, f: FleetIndex) -> bool {
        self.fleet_status.get(f.0).map_or(false, |s| s.alive)
    }
}

/// `int(x + 0.5)`: round-half-up truncation for non-negative doubles.
pub(crate) fn round_half_up(x: f64) -> i32 {
    (x + 0.5) as i32
}

/// `int(x + 1.5)`: the "round up" truncation the damage formulas use under
/// non-alternative combat.
pub(crate) fn round_up_half(x: f64) -> i32 {
    (x + 1.5) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{ExperienceOption, ScalarOption as SO};
    use crate::null_visualizer::NullVisualizer;
    use crate::unit::UnitData;

    struct FakeEnv;
    impl Environment for FakeEnv {
        fn get_configuration(&self, option: SO) -> i32 {
            match option {
                SO::AllowAlternativeCombat => 1,
                SO::FireOnAttackFighters => 0,
                SO::StandoffDistance => 100,
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

    fn small_setup() -> Setup {
        let config = crate::configuration::Configuration::default();

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

        let mut rng = Lcg::new(42);
        setup.init_after_setup(&config, &FakeEnv, &mut rng).unwrap();
        setup
    }

    #[test]
    fn time_is_zero_after_init_and_monotone_afterwards() {
        let env = FakeEnv;
        let setup = small_setup();
        let mut algo = Algorithm::new(&setup, &env);
        let mut vis = NullVisualizer;
        algo.init(&env, &mut vis);
        assert_eq!(algo.get_time(), 0);

        let mut last = 0;
        for _ in 0..2000 {
            if !algo.play_cycle(&env, &mut vis) {
                break;
            }
            assert_eq!(algo.get_time(), last + 1);
            last = algo.get_time();
        }
    }

    #[test]
    fn determinism_for_fixed_seed() {
        let env = FakeEnv;
        let setup = small_setup();

        let mut a = Algorithm::new(&setup, &env);
        let mut vis_a = NullVisualizer;
        a.init(&env, &mut vis_a);
        while a.play_cycle(&env, &mut vis_a) {}

        let mut b = Algorithm::new(&setup, &env);
        let mut vis_b = NullVisualizer;
        b.init(&env, &mut vis_b);
        while b.play_cycle(&env, &mut vis_b) {}

        assert_eq!(a.get_time(), b.get_time());
        for i in 0..a.num_units() {
            let sa = a.unit_status(UnitIndex(i)).unwrap();
            let sb = b.unit_status(UnitIndex(i)).unwrap();
            assert_eq!(sa.alive, sb.alive);
            assert_eq!(sa.damage, sb.damage);
            assert_eq!(sa.crew, sb.crew);
        }
    }

    #[test]
    fn termination_soundness() {
        let env = FakeEnv;
        let setup = small_setup();
        let mut algo = Algorithm::new(&setup, &env);
        let mut vis = NullVisualizer;
        algo.init(&env, &mut vis);
        while algo.play_cycle(&env, &mut vis) {}

        assert!(algo.is_terminated());
        for &p in &algo.player_index {
            assert!(algo.players[p].objects.is_empty());
        }
        for f in 0..algo.num_fleets() {
            if algo.is_fleet_alive(FleetIndex(f)) {
                assert!(algo.fleet_status(FleetIndex(f)).unwrap().enemy.is_none());
            }
        }
    }

    #[test]
    fn status_token_round_trips() {
        let env = FakeEnv;
        let setup = small_setup();
        let mut algo = Algorithm::new(&setup, &env);
        let mut vis = NullVisualizer;
        algo.init(&env, &mut vis);

        for _ in 0..5 {
            algo.play_cycle(&env, &mut vis);
        }
        let token = algo.create_status_token();
        let time_at_snapshot = algo.get_time();

        while algo.play_cycle(&env, &mut vis) {}
        let final_time_a = algo.get_time();
        let final_alive_a: Vec<bool> = (0..algo.num_units()).map(|i| algo.is_unit_alive(UnitIndex(i))).collect();

        algo.apply_status_token(&token);
        assert_eq!(algo.get_time(), time_at_snapshot);
        while algo.play_cycle(&env, &mut vis) {}
        let final_time_b = algo.get_time();
        let final_alive_b: Vec<bool> = (0..algo.num_units()).map(|i| algo.is_unit_alive(UnitIndex(i))).collect();

        assert_eq!(final_time_a, final_time_b);
        assert_eq!(final_alive_a, final_alive_b);
    }
}
