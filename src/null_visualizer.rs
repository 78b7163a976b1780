//! A `Visualizer` that discards every callback. Used by the `Battle` façade
//! to play a setup once and derive the "after" state without paying for
//! event serialization.

use crate::fleet::FleetIndex;
use crate::position::Position;
use crate::transient::VisId;
use crate::unit::UnitIndex;
use crate::visualizer::{ShipInfo, Visualizer};

#[derive(Debug, Default, Clone, Copy)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn update_time(&mut self, _time: i32) {}

    fn fire_beam_fighter_fighter(&mut self, _from: VisId, _to: VisId, _hits: bool) {}
    fn fire_beam_fighter_ship(&mut self, _from: VisId, _to: UnitIndex, _hits: bool) {}
    fn fire_beam_ship_fighter(&mut self, _from: UnitIndex, _beam_nr: i32, _to: VisId, _hits: bool) {}
    fn fire_beam_ship_ship(&mut self, _from: UnitIndex, _beam_nr: i32, _to: UnitIndex, _hits: bool) {}

    fn create_fighter(&mut self, _id: VisId, _pos: Position, _player: i32, _enemy: Option<UnitIndex>) {}
    fn kill_fighter(&mut self, _id: VisId) {}
    fn land_fighter(&mut self, _id: VisId) {}
    fn move_fighter(&mut self, _id: VisId, _pos: Position, _to: Option<UnitIndex>) {}

    fn create_fleet(&mut self, _fleet_nr: FleetIndex, _x: i32, _y: i32, _player: i32, _first_ship: UnitIndex, _num_ships: usize) {}
    fn set_enemy(&mut self, _fleet_nr: FleetIndex, _enemy: Option<UnitIndex>) {}
    fn kill_fleet(&mut self, _fleet_nr: FleetIndex) {}
    fn move_fleet(&mut self, _fleet_nr: FleetIndex, _x: i32, _y: i32) {}

    fn create_ship(&mut self, _ship_nr: UnitIndex, _pos: Position, _info: &ShipInfo) {}
    fn kill_ship(&mut self, _ship_nr: UnitIndex) {}
    fn move_ship(&mut self, _ship_nr: UnitIndex, _pos: Position) {}

    fn create_torpedo(&mut self, _id: VisId, _pos: Position, _player: i32, _enemy: Option<UnitIndex>) {}
    fn hit_torpedo(&mut self, _id: VisId, _ship_nr: UnitIndex) {}
    fn miss_torpedo(&mut self, _id: VisId) {}
    fn move_torpedo(&mut self, _id: VisId, _pos: Position) {}
}
