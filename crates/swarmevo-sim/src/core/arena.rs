use rand::Rng;

use crate::core::vec2::Vec2;

/// The rectangular world a scenario simulates in.
///
/// Bounds run from the origin `(0, 0)` to `(width, height)`. Scenarios
/// keep every bot inside these bounds; intelligences receive the bounds in
/// each observation so they can steer away from walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the center point of the arena.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns the length of the arena diagonal, the largest possible
    /// distance between two points inside the bounds.
    #[must_use]
    pub fn diagonal(self) -> f32 {
        Vec2::new(self.width, self.height).length()
    }

    #[must_use]
    pub fn contains(self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Clamps a point into the bounds.
    ///
    /// Returns the clamped point and whether clamping was necessary, so
    /// callers can count wall contacts.
    #[must_use]
    pub fn clamp(self, point: Vec2) -> (Vec2, bool) {
        let clamped = Vec2::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        );
        (clamped, clamped != point)
    }

    /// Samples a uniformly distributed point inside the bounds.
    pub fn random_point<R>(self, rng: &mut R) -> Vec2
    where
        R: Rng + ?Sized,
    {
        Vec2::new(
            rng.random_range(0.0..=self.width),
            rng.random_range(0.0..=self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_contains_boundary_points() {
        let bounds = ArenaBounds::new(10.0, 5.0);
        assert!(bounds.contains(Vec2::ZERO));
        assert!(bounds.contains(Vec2::new(10.0, 5.0)));
        assert!(!bounds.contains(Vec2::new(10.1, 5.0)));
        assert!(!bounds.contains(Vec2::new(-0.1, 2.0)));
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let bounds = ArenaBounds::new(10.0, 5.0);
        let (point, hit) = bounds.clamp(Vec2::new(3.0, 4.0));
        assert_eq!(point, Vec2::new(3.0, 4.0));
        assert!(!hit);
    }

    #[test]
    fn test_clamp_outside_reports_contact() {
        let bounds = ArenaBounds::new(10.0, 5.0);
        let (point, hit) = bounds.clamp(Vec2::new(12.0, -1.0));
        assert_eq!(point, Vec2::new(10.0, 0.0));
        assert!(hit);
    }

    #[test]
    fn test_random_point_stays_inside() {
        let bounds = ArenaBounds::new(20.0, 30.0);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert!(bounds.contains(bounds.random_point(&mut rng)));
        }
    }

    #[test]
    fn test_diagonal() {
        let bounds = ArenaBounds::new(3.0, 4.0);
        assert_eq!(bounds.diagonal(), 5.0);
    }
}
