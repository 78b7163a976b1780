//! Fighters and torpedoes: short-lived objects spawned by a unit and later
//! destroyed, landed, or resolved on impact.

use crate::position::Position;
use crate::unit::UnitIndex;

/// Index into the simulator's visualization-id space. Reused across life
/// cycles; callers must treat an id as fresh on every `create*` visualizer
/// callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisId(pub usize);

/// Sentinel meaning "no enemy" / "attacking no one".
pub const NO_ENEMY: Option<UnitIndex> = None;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Fighter,
    Torpedo,
}

/// A fighter or torpedo in flight. Stored in a dense pool indexed by `VisId`;
/// stable index into the pool is what player aggregates reference.
#[derive(Debug, Clone)]
pub struct TransientObject {
    pub kind: ObjectKind,
    pub vis_id: VisId,
    /// The unit that launched this object. Goes to `None` when a fighter's
    /// carrier dies and it has not yet found a replacement base.
    pub owner_unit: Option<UnitIndex>,
    pub owner_player: i32,
    pub enemy: Option<UnitIndex>,
    pub position: Position,
    /// Fighters: strike budget. Torpedoes: 1 = will hit, 0 = will miss,
    /// decided at launch.
    pub strikes: i32,
    pub can_change_enemy: bool,
    pub kill: i32,
    pub explosive: i32,
    /// Passed straight through to `hit_ship_with`'s death-ray branch. Always 1
    /// for fighters; for torpedoes this is the weapon's explosive power,
    /// which may itself be 0 (a torpedo-borne death ray).
    pub death_flag: i32,
    pub speed: i32,
    /// Set during combat/movement phases; physically removed by the
    /// per-player GC phase of the same tick.
    pub marked_for_deletion: bool,
}

impl TransientObject {
    pub fn is_fighter(&self) -> bool {
        self.kind == ObjectKind::Fighter
    }

    pub fn is_torpedo(&self) -> bool {
        self.kind == ObjectKind::Torpedo
    }
}
