//! Two dimensional vector algebra for positions, velocities and forces.
//!
//! All quantities are plain `glam::Vec2` values: forces sum component-wise
//! and a force divided by a dimensionless number is still a force.

use glam::Vec2;

/// A force acting on a body
pub type Force = Vec2;

/// A point in simulation space
pub type Point = Vec2;

/// Build a vector pointing along `(dx, dy)` whose length is `strength`.
///
/// A negative `strength` points the result the opposite way. A zero
/// direction has no defined orientation and yields the zero vector for any
/// strength.
pub fn force_in_direction(dx: f32, dy: f32, strength: f32) -> Force {
    Vec2::new(dx, dy).normalize_or_zero() * strength
}

/// Build a vector of length `strength` pointing from `from` toward `to`.
pub fn force_toward(from: Point, to: Point, strength: f32) -> Force {
    let delta = to - from;
    force_in_direction(delta.x, delta.y, strength)
}

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f32 {
    a.distance(b)
}

/// Sum a sequence of forces
pub fn total_force(forces: impl IntoIterator<Item = Force>) -> Force {
    forces.into_iter().fold(Force::ZERO, |total, f| total + f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_in_direction_magnitude() {
        let f = force_in_direction(3.0, 4.0, 10.0);
        assert!((f.x - 6.0).abs() < 1e-5);
        assert!((f.y - 8.0).abs() < 1e-5);
        assert!((f.length() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_negative_strength_flips() {
        let f = force_in_direction(1.0, 0.0, -2.0);
        assert_eq!(f, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_degenerate_direction_is_zero() {
        for strength in [0.0, 1.0, -5.0, 1e6] {
            let f = force_toward(Vec2::new(2.0, 3.0), Vec2::new(2.0, 3.0), strength);
            assert_eq!(f, Force::ZERO);
            assert!(f.is_finite());
        }
    }

    #[test]
    fn test_force_algebra() {
        let sum = total_force([Vec2::new(1.0, 2.0), Vec2::new(-3.0, 0.5)]);
        assert_eq!(sum, Vec2::new(-2.0, 2.5));
        assert_eq!(sum / 2.0, Vec2::new(-1.0, 1.25));
        assert_eq!(total_force(std::iter::empty()), Force::ZERO);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Vec2::ZERO, Vec2::new(3.0, 4.0)), 5.0);
    }
}
