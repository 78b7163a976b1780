//! Visualisation of a FLAK fight: the narrow callback surface the simulator
//! emits events through. Ships and fleets are identified by indexes, in the
//! same way as in the `Algorithm` or `Setup`. Fighters and torpedoes are
//! "objects" and are identified by a [`VisId`]; ids are reused when an
//! object is destroyed and should be treated as fresh on every `create_*`.

use serde::{Deserialize, Serialize};

use crate::fleet::FleetIndex;
use crate::position::Position;
use crate::transient::VisId;
use crate::unit::UnitIndex;

/// "No enemy" / "attacking no one" sentinel for ship targets.
pub const NO_ENEMY: Option<UnitIndex> = None;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShipInfo {
    pub name: String,
    pub is_planet: bool,
    pub player: i32,
    pub shield: i32,
    pub damage: i32,
    pub crew: i32,
    pub num_beams: i32,
    pub num_launchers: i32,
    pub num_torpedoes: i32,
    pub num_bays: i32,
    pub num_fighters: i32,
    pub torpedo_type: i32,
    pub beam_type: i32,
    pub mass: i32,
    pub id: i32,
}

/// Receives visualisation events from an `Algorithm`. All twenty methods
/// must be implemented; a sink that discards everything is [`crate::null_visualizer::NullVisualizer`].
pub trait Visualizer {
    /// Called once per battle tick.
    fn update_time(&mut self, time: i32);

    fn fire_beam_fighter_fighter(&mut self, from: VisId, to: VisId, hits: bool);
    fn fire_beam_fighter_ship(&mut self, from: VisId, to: UnitIndex, hits: bool);
    fn fire_beam_ship_fighter(&mut self, from: UnitIndex, beam_nr: i32, to: VisId, hits: bool);
    fn fire_beam_ship_ship(&mut self, from: UnitIndex, beam_nr: i32, to: UnitIndex, hits: bool);

    fn create_fighter(&mut self, id: VisId, pos: Position, player: i32, enemy: Option<UnitIndex>);
    fn kill_fighter(&mut self, id: VisId);
    fn land_fighter(&mut self, id: VisId);
    fn move_fighter(&mut self, id: VisId, pos: Position, to: Option<UnitIndex>);

    fn create_fleet(&mut self, fleet_nr: FleetIndex, x: i32, y: i32, player: i32, first_ship: UnitIndex, num_ships: usize);
    fn set_enemy(&mut self, fleet_nr: FleetIndex, enemy: Option<UnitIndex>);
    fn kill_fleet(&mut self, fleet_nr: FleetIndex);
    fn move_fleet(&mut self, fleet_nr: FleetIndex, x: i32, y: i32);

    fn create_ship(&mut self, ship_nr: UnitIndex, pos: Position, info: &ShipInfo);
    fn kill_ship(&mut self, ship_nr: UnitIndex);
    fn move_ship(&mut self, ship_nr: UnitIndex, pos: Position);

    fn create_torpedo(&mut self, id: VisId, pos: Position, player: i32, enemy: Option<UnitIndex>);
    fn hit_torpedo(&mut self, id: VisId, ship_nr: UnitIndex);
    fn miss_torpedo(&mut self, id: VisId);
    fn move_torpedo(&mut self, id: VisId, pos: Position);
}
