//! Implements the `Visualizer` sink by recording each callback as a tagged
//! entry in a flat buffer, so the events of one tick can be handed to a
//! consumer thread (or serialized across a wasm boundary) and replayed
//! later onto a live `Visualizer`. This is the only cross-thread data path
//! in the simulator and carries no shared mutable state: the buffer is
//! swapped out, not shared.

use serde::{Deserialize, Serialize};

use crate::fleet::FleetIndex;
use crate::position::Position;
use crate::transient::VisId;
use crate::unit::UnitIndex;
use crate::visualizer::{ShipInfo, Visualizer};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", tag = "op")]
pub enum Event {
    UpdateTime { time: i32 },
    FireBeamFighterFighter { from: VisIdWire, to: VisIdWire, hits: bool },
    FireBeamFighterShip { from: VisIdWire, to: UnitIndexWire, hits: bool },
    FireBeamShipFighter { from: UnitIndexWire, beam_nr: i32, to: VisIdWire, hits: bool },
    FireBeamShipShip { from: UnitIndexWire, beam_nr: i32, to: UnitIndexWire, hits: bool },
    CreateFighter { id: VisIdWire, pos: Position, player: i32, enemy: Option<UnitIndexWire> },
    KillFighter { id: VisIdWire },
    LandFighter { id: VisIdWire },
    MoveFighter { id: VisIdWire, pos: Position, to: Option<UnitIndexWire> },
    CreateFleet { fleet_nr: usize, x: i32, y: i32, player: i32, first_ship: UnitIndexWire, num_ships: usize },
    SetEnemy { fleet_nr: usize, enemy: Option<UnitIndexWire> },
    KillFleet { fleet_nr: usize },
    MoveFleet { fleet_nr: usize, x: i32, y: i32 },
    CreateShip { ship_nr: UnitIndexWire, pos: Position, info: ShipInfo },
    KillShip { ship_nr: UnitIndexWire },
    MoveShip { ship_nr: UnitIndexWire, pos: Position },
    CreateTorpedo { id: VisIdWire, pos: Position, player: i32, enemy: Option<UnitIndexWire> },
    HitTorpedo { id: VisIdWire, ship_nr: UnitIndexWire },
    MissTorpedo { id: VisIdWire },
    MoveTorpedo { id: VisIdWire, pos: Position },
}

/// Plain `usize` newtypes don't round-trip well as wasm/JSON payloads next
/// to serde's derive defaults, so the wire form is just the bare index.
pub type VisIdWire = usize;
pub type UnitIndexWire = usize;

fn wire(id: VisId) -> VisIdWire {
    id.0
}
fn unwire(id: VisIdWire) -> VisId {
    VisId(id)
}
fn uwire(id: UnitIndex) -> UnitIndexWire {
    id.0
}
fn unuwire(id: UnitIndexWire) -> UnitIndex {
    UnitIndex(id)
}

#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    events: Vec<Event>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchanges this recorder's buffer with `content`, e.g. to hand a
    /// finished tick's events to a consumer and start a fresh buffer.
    pub fn swap_content(&mut self, content: &mut Vec<Event>) {
        std::mem::swap(&mut self.events, content);
    }

    pub fn size(&self) -> usize {
        self.events.len()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Calls every recorded callback, in the same order, on `vis`.
    pub fn replay(&self, vis: &mut dyn Visualizer) {
        for event in &self.events {
            replay_one(event, vis);
        }
    }
}

fn replay_one(event: &Event, vis: &mut dyn Visualizer) {
    match *event {
        Event::UpdateTime { time } => vis.update_time(time),
        Event::FireBeamFighterFighter { from, to, hits } => vis.fire_beam_fighter_fighter(unwire(from), unwire(to), hits),
        Event::FireBeamFighterShip { from, to, hits } => vis.fire_beam_fighter_ship(unwire(from), unuwire(to), hits),
        Event::FireBeamShipFighter { from, beam_nr, to, hits } => vis.fire_beam_ship_fighter(unuwire(from), beam_nr, unwire(to), hits),
        Event::FireBeamShipShip { from, beam_nr, to, hits } => vis.fire_beam_ship_ship(unuwire(from), beam_nr, unuwire(to), hits),
        Event::CreateFighter { id, pos, player, enemy } => vis.create_fighter(unwire(id), pos, player, enemy.map(ununwire_opt)),
        Event::KillFighter { id } => vis.kill_fighter(unwire(id)),
        Event::LandFighter { id } => vis.land_fighter(unwire(id)),
        Event::MoveFighter { id, pos, to } => vis.move_fighter(unwire(id), pos, to.map(ununwire_opt)),
        Event::CreateFleet { fleet_nr, x, y, player, first_ship, num_ships } => {
            vis.create_fleet(FleetIndex(fleet_nr), x, y, player, unuwire(first_ship), num_ships)
        }
        Event::SetEnemy { fleet_nr, enemy } => vis.set_enemy(FleetIndex(fleet_nr), enemy.map(ununwire_opt)),
        Event::KillFleet { fleet_nr } => vis.kill_fleet(FleetIndex(fleet_nr)),
        Event::MoveFleet { fleet_nr, x, y } => vis.move_fleet(FleetIndex(fleet_nr), x, y),
        Event::CreateShip { ship_nr, pos, ref info } => vis.create_ship(unuwire(ship_nr), pos, info),
        Event::KillShip { ship_nr } => vis.kill_ship(unuwire(ship_nr)),
        Event::MoveShip { ship_nr, pos } => vis.move_ship(unuwire(ship_nr), pos),
        Event::CreateTorpedo { id, pos, player, enemy } => vis.create_torpedo(unwire(id), pos, player, enemy.map(ununwire_opt)),
        Event::HitTorpedo { id, ship_nr } => vis.hit_torpedo(unwire(id), unuwire(ship_nr)),
        Event::MissTorpedo { id } => vis.miss_torpedo(unwire(id)),
        Event::MoveTorpedo { id, pos } => vis.move_torpedo(unwire(id), pos),
    }
}

fn ununwire_opt(id: UnitIndexWire) -> UnitIndex {
    unuwire(id)
}

impl Visualizer for EventRecorder {
    fn update_time(&mut self, time: i32) {
        self.events.push(Event::UpdateTime { time });
    }

    fn fire_beam_fighter_fighter(&mut self, from: VisId, to: VisId, hits: bool) {
        self.events.push(Event::FireBeamFighterFighter { from: wire(from), to: wire(to), hits });
    }
    fn fire_beam_fighter_ship(&mut self, from: VisId, to: UnitIndex, hits: bool) {
        self.events.push(Event::FireBeamFighterShip { from: wire(from), to: uwire(to), hits });
    }
    fn fire_beam_ship_fighter(&mut self, from: UnitIndex, beam_nr: i32, to: VisId, hits: bool) {
        self.events.push(Event::FireBeamShipFighter { from: uwire(from), beam_nr, to: wire(to), hits });
    }
    fn fire_beam_ship_ship(&mut self, from: UnitIndex, beam_nr: i32, to: UnitIndex, hits: bool) {
        self.events.push(Event::FireBeamShipShip { from: uwire(from), beam_nr, to: uwire(to), hits });
    }

    fn create_fighter(&mut self, id: VisId, pos: Position, player: i32, enemy: Option<UnitIndex>) {
        self.events.push(Event::CreateFighter { id: wire(id), pos, player, enemy: enemy.map(uwire) });
    }
    fn kill_fighter(&mut self, id: VisId) {
        self.events.push(Event::KillFighter { id: wire(id) });
    }
    fn land_fighter(&mut self, id: VisId) {
        self.events.push(Event::LandFighter { id: wire(id) });
    }
    fn move_fighter(&mut self, id: VisId, pos: Position, to: Option<UnitIndex>) {
        self.events.push(Event::MoveFighter { id: wire(id), pos, to: to.map(uwire) });
    }

    fn create_fleet(&mut self, fleet_nr: FleetIndex, x: i32, y: i32, player: i32, first_ship: UnitIndex, num_ships: usize) {
        self.events.push(Event::CreateFleet { fleet_nr: fleet_nr.0, x, y, player, first_ship: uwire(first_ship), num_ships });
    }
    fn set_enemy(&mut self, fleet_nr: FleetIndex, enemy: Option<UnitIndex>) {
        self.events.push(Event::SetEnemy { fleet_nr: fleet_nr.0, enemy: enemy.map(uwire) });
    }
    fn kill_fleet(&mut self, fleet_nr: FleetIndex) {
        self.events.push(Event::KillFleet { fleet_nr: fleet_nr.0 });
    }
    fn move_fleet(&mut self, fleet_nr: FleetIndex, x: i32, y: i32) {
        self.events.push(Event::MoveFleet { fleet_nr: fleet_nr.0, x, y });
    }

    fn create_ship(&mut self, ship_nr: UnitIndex, pos: Position, info: &ShipInfo) {
        self.events.push(Event::CreateShip { ship_nr: uwire(ship_nr), pos, info: info.clone() });
    }
    fn kill_ship(&mut self, ship_nr: UnitIndex) {
        self.events.push(Event::KillShip { ship_nr: uwire(ship_nr) });
    }
    fn move_ship(&mut self, ship_nr: UnitIndex, pos: Position) {
        self.events.push(Event::MoveShip { ship_nr: uwire(ship_nr), pos });
    }

    fn create_torpedo(&mut self, id: VisId, pos: Position, player: i32, enemy: Option<UnitIndex>) {
        self.events.push(Event::CreateTorpedo { id: wire(id), pos, player, enemy: enemy.map(uwire) });
    }
    fn hit_torpedo(&mut self, id: VisId, ship_nr: UnitIndex) {
        self.events.push(Event::HitTorpedo { id: wire(id), ship_nr: uwire(ship_nr) });
    }
    fn miss_torpedo(&mut self, id: VisId) {
        self.events.push(Event::MissTorpedo { id: wire(id) });
    }
    fn move_torpedo(&mut self, id: VisId, pos: Position) {
        self.events.push(Event::MoveTorpedo { id: wire(id), pos });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null_visualizer::NullVisualizer;

    struct CountingVisualizer(usize);
    impl Visualizer for CountingVisualizer {
        fn update_time(&mut self, _time: i32) {
            self.0 += 1;
        }
        fn fire_beam_fighter_fighter(&mut self, _f: VisId, _t: VisId, _h: bool) {}
        fn fire_beam_fighter_ship(&mut self, _f: VisId, _t: UnitIndex, _h: bool) {}
        fn fire_beam_ship_fighter(&mut self, _f: UnitIndex, _b: i32, _t: VisId, _h: bool) {}
        fn fire_beam_ship_ship(&mut self, _f: UnitIndex, _b: i32, _t: UnitIndex, _h: bool) {}
        fn create_fighter(&mut self, _i: VisId, _p: Position, _pl: i32, _e: Option<UnitIndex>) {}
        fn kill_fighter(&mut self, _i: VisId) {}
        fn land_fighter(&mut self, _i: VisId) {}
        fn move_fighter(&mut self, _i: VisId, _p: Position, _t: Option<UnitIndex>) {}
        fn create_fleet(&mut self, _f: FleetIndex, _x: i32, _y: i32, _pl: i32, _s: UnitIndex, _n: usize) {}
        fn set_enemy(&mut self, _f: FleetIndex, _e: Option<UnitIndex>) {}
        fn kill_fleet(&mut self, _f: FleetIndex) {}
        fn move_fleet(&mut self, _f: FleetIndex, _x: i32, _y: i32) {}
        fn create_ship(&mut self, _s: UnitIndex, _p: Position, _i: &ShipInfo) {}
        fn kill_ship(&mut self, _s: UnitIndex) {}
        fn move_ship(&mut self, _s: UnitIndex, _p: Position) {}
        fn create_torpedo(&mut self, _i: VisId, _p: Position, _pl: i32, _e: Option<UnitIndex>) {}
        fn hit_torpedo(&mut self, _i: VisId, _s: UnitIndex) {}
        fn miss_torpedo(&mut self, _i: VisId) {}
        fn move_torpedo(&mut self, _i: VisId, _p: Position) {}
    }

    #[test]
    fn replay_reissues_every_recorded_call_in_order() {
        let mut rec = EventRecorder::new();
        rec.update_time(1);
        rec.update_time(2);
        rec.update_time(3);
        assert_eq!(rec.size(), 3);

        let mut counting = CountingVisualizer(0);
        rec.replay(&mut counting);
        assert_eq!(counting.0, 3);

        let mut discard = NullVisualizer;
        rec.replay(&mut discard);
    }

    #[test]
    fn swap_content_exchanges_buffers() {
        let mut rec = EventRecorder::new();
        rec.update_time(5);
        let mut taken = Vec::new();
        rec.swap_content(&mut taken);
        assert_eq!(taken.len(), 1);
        assert_eq!(rec.size(), 0);
    }
}
