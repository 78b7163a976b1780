use serde::{Deserialize, Serialize};

/// A point in 3-D space. The engine computes 3-D coordinates but combat rules
/// only ever look at (x, y); z only spaces fleetmates apart visually.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance, ignoring z.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bounding-box reject then squared-distance compare, integer-only.
    pub fn is_distance_le_radius(&self, other: &Position, radius: i32) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx <= radius && dy <= radius && dx.saturating_mul(dx) + dy.saturating_mul(dy) <= radius.saturating_mul(radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_ignores_z() {
        let a = Position::new(0, 0, 100);
        let b = Position::new(3, 4, -900);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn radius_check_matches_distance() {
        let a = Position::new(0, 0, 0);
        let b = Position::new(3, 4, 0);
        assert!(a.is_distance_le_radius(&b, 5));
        assert!(!a.is_distance_le_radius(&b, 4));
    }
}
