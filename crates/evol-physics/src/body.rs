//! Physical bodies: point masses moved by attached force sources.

use crate::mass::{BallEnd, MassModel};
use crate::source::ForceSource;
use evol_core::{total_force, BodyId, Error, Force, Point, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Shared handle to a body; muscles keep weak references to it
pub type BodyRef = Rc<RefCell<PhysicalBody>>;

/// Kinematic state of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Point,
    pub velocity: Vec2,
}

/// A point mass in simulation space
#[derive(Debug)]
pub struct PhysicalBody {
    id: BodyId,
    state: BodyState,
    mass: Box<dyn MassModel>,
    force_sources: Vec<Weak<dyn ForceSource>>,
}

impl PhysicalBody {
    /// Create a body at rest. Fails if the mass model reports a non-positive mass.
    pub fn new(position: Point, mass: impl MassModel + 'static) -> Result<Self> {
        let initial = mass.mass();
        if initial.is_nan() || initial <= 0.0 {
            return Err(Error::InvalidMass(initial));
        }

        Ok(Self {
            id: BodyId::new(),
            state: BodyState {
                position,
                velocity: Vec2::ZERO,
            },
            mass: Box::new(mass),
            force_sources: Vec::new(),
        })
    }

    /// A unit-mass ball at `(x, y)`
    pub fn ball(x: f32, y: f32) -> Self {
        Self {
            id: BodyId::new(),
            state: BodyState {
                position: Vec2::new(x, y),
                velocity: Vec2::ZERO,
            },
            mass: Box::new(BallEnd),
            force_sources: Vec::new(),
        }
    }

    pub fn into_ref(self) -> BodyRef {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.state.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    pub fn state(&self) -> BodyState {
        self.state
    }

    pub fn mass(&self) -> f32 {
        self.mass.mass()
    }

    /// Attach a force source. The body does not keep it alive.
    pub fn add_force_source(&mut self, source: Weak<dyn ForceSource>) {
        self.force_sources.push(source);
    }

    pub fn force_source_count(&self) -> usize {
        self.force_sources.len()
    }

    /// Sum of the forces every live source currently exerts on this body
    pub fn net_force(&self) -> Force {
        total_force(
            self.force_sources
                .iter()
                .filter_map(Weak::upgrade)
                .map(|source| source.force_on(self.id)),
        )
    }

    /// Query the mass model, rejecting a non-positive mass
    pub fn checked_mass(&self) -> Result<f32> {
        let mass = self.mass.mass();
        if mass.is_nan() || mass <= 0.0 {
            return Err(Error::InvalidMass(mass));
        }
        Ok(mass)
    }

    /// Advance one tick of length `dt`: F = m * a, dv = a * dt, dp = v * dt.
    pub fn integrate(&mut self, dt: f32) -> Result<()> {
        let mass = self.checked_mass()?;
        self.integrate_with_mass(dt, mass);
        Ok(())
    }

    /// Advance one tick using a mass already obtained from [`checked_mass`](Self::checked_mass)
    pub fn integrate_with_mass(&mut self, dt: f32, mass: f32) {
        self.force_sources.retain(|source| source.strong_count() > 0);

        let total = self.net_force();
        let acceleration = total / mass;
        self.state.velocity += acceleration * dt;
        self.state.position += self.state.velocity * dt;

        trace!(
            body_id = %self.id,
            force_x = total.x,
            force_y = total.y,
            position_x = self.state.position.x,
            position_y = self.state.position.y,
            "Body integrated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mass::FixedMass;
    use std::cell::Cell;

    /// A constant push applied to a single body
    struct ConstantForce {
        target: BodyId,
        force: Force,
    }

    impl ForceSource for ConstantForce {
        fn force_on(&self, body: BodyId) -> Force {
            if body == self.target {
                self.force
            } else {
                Force::ZERO
            }
        }
    }

    #[derive(Debug)]
    struct ShrinkingMass(Cell<f32>);

    impl MassModel for ShrinkingMass {
        fn mass(&self) -> f32 {
            let m = self.0.get();
            self.0.set(m - 1.0);
            m
        }
    }

    #[test]
    fn test_body_at_rest_stays_put() {
        let mut body = PhysicalBody::ball(1.0, 2.0);
        for _ in 0..10 {
            body.integrate(0.02).unwrap();
        }
        assert_eq!(body.position(), Vec2::new(1.0, 2.0));
        assert_eq!(body.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_semi_implicit_euler_step() {
        let mut body = PhysicalBody::new(Vec2::ZERO, FixedMass::new(2.0).unwrap()).unwrap();
        let push: Rc<dyn ForceSource> = Rc::new(ConstantForce {
            target: body.id(),
            force: Vec2::new(4.0, 0.0),
        });
        body.add_force_source(Rc::downgrade(&push));

        body.integrate(0.5).unwrap();
        // a = 2, v = 1, p = 0.5 (velocity updated before position)
        assert_eq!(body.velocity(), Vec2::new(1.0, 0.0));
        assert_eq!(body.position(), Vec2::new(0.5, 0.0));

        body.integrate(0.5).unwrap();
        assert_eq!(body.velocity(), Vec2::new(2.0, 0.0));
        assert_eq!(body.position(), Vec2::new(1.5, 0.0));
    }

    #[test]
    fn test_foreign_source_exerts_nothing() {
        let mut body = PhysicalBody::ball(0.0, 0.0);
        let other = PhysicalBody::ball(5.0, 5.0);
        let push: Rc<dyn ForceSource> = Rc::new(ConstantForce {
            target: other.id(),
            force: Vec2::new(10.0, 10.0),
        });
        body.add_force_source(Rc::downgrade(&push));
        assert_eq!(body.net_force(), Force::ZERO);
        body.integrate(1.0).unwrap();
        assert_eq!(body.position(), Vec2::ZERO);
    }

    #[test]
    fn test_dropped_source_is_released() {
        let mut body = PhysicalBody::ball(0.0, 0.0);
        let push: Rc<dyn ForceSource> = Rc::new(ConstantForce {
            target: body.id(),
            force: Vec2::new(1.0, 0.0),
        });
        body.add_force_source(Rc::downgrade(&push));
        assert_eq!(body.force_source_count(), 1);

        drop(push);
        body.integrate(1.0).unwrap();
        assert_eq!(body.force_source_count(), 0);
        assert_eq!(body.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_non_positive_mass_rejected() {
        assert!(matches!(
            PhysicalBody::new(Vec2::ZERO, ShrinkingMass(Cell::new(0.0))),
            Err(Error::InvalidMass(_))
        ));

        // Mass is re-queried each tick: 1.0 at construction, 0.0 on the first step.
        let mut body = PhysicalBody::new(Vec2::ZERO, ShrinkingMass(Cell::new(1.0))).unwrap();
        assert!(matches!(body.integrate(0.02), Err(Error::InvalidMass(_))));
        assert!(matches!(body.checked_mass(), Err(Error::InvalidMass(m)) if m < 0.0));
    }
}
