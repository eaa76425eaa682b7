//! Muscles: actuators that turn an axon signal into a spring force between two bodies.

use crate::inputs::AxonInputs;
use crate::node::Node;
use evol_core::{distance, force_in_direction, BodyId, Force, MuscleConfig, Result};
use evol_physics::{BodyRef, ForceSource, PhysicalBody};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::trace;

/// The forces a muscle last computed, shared with the bodies it is attached to
#[derive(Debug, Default)]
struct Tension {
    ends: Cell<Option<(BodyId, BodyId)>>,
    force_a: Cell<Force>,
    force_b: Cell<Force>,
}

impl ForceSource for Tension {
    fn force_on(&self, body: BodyId) -> Force {
        match self.ends.get() {
            Some((a, _)) if a == body => self.force_a.get(),
            Some((_, b)) if b == body => self.force_b.get(),
            _ => Force::ZERO,
        }
    }
}

#[derive(Debug)]
struct Ends {
    a: Weak<RefCell<PhysicalBody>>,
    b: Weak<RefCell<PhysicalBody>>,
}

/// A spring whose target length is driven by its first input axon.
///
/// `update()` reads the driving axon and clamps it into the configured
/// length range; `commit()` measures the current length and computes the
/// force on each end, half the spring force each.
#[derive(Debug)]
pub struct Muscle {
    inputs: AxonInputs,
    lengths: MuscleConfig,
    rigidity: f32,
    desired_length: f32,
    ends: Option<Ends>,
    tension: Rc<Tension>,
}

impl Muscle {
    /// A muscle with the default 0.5 to 1.5 length range
    pub fn new(rigidity: f32) -> Self {
        Self::build(rigidity, MuscleConfig::default())
    }

    /// Fails if `lengths` is not an ordered, finite range
    pub fn with_lengths(rigidity: f32, lengths: MuscleConfig) -> Result<Self> {
        lengths.validate()?;
        Ok(Self::build(rigidity, lengths))
    }

    fn build(rigidity: f32, lengths: MuscleConfig) -> Self {
        Self {
            inputs: AxonInputs::new(),
            desired_length: lengths.rest_length,
            lengths,
            rigidity,
            ends: None,
            tension: Rc::new(Tension::default()),
        }
    }

    /// Attach the muscle between two bodies and register it as a force
    /// source on both. Reconnecting detaches the muscle from its old ends.
    pub fn connect_ends(&mut self, a: &BodyRef, b: &BodyRef) {
        let (id_a, id_b) = (a.borrow().id(), b.borrow().id());
        self.tension.ends.set(Some((id_a, id_b)));
        self.tension.force_a.set(Force::ZERO);
        self.tension.force_b.set(Force::ZERO);

        let source: Weak<dyn ForceSource> = Rc::downgrade(&self.tension) as Weak<dyn ForceSource>;
        a.borrow_mut().add_force_source(source.clone());
        if !Rc::ptr_eq(a, b) {
            b.borrow_mut().add_force_source(source);
        }

        self.ends = Some(Ends {
            a: Rc::downgrade(a),
            b: Rc::downgrade(b),
        });
    }

    pub fn is_connected(&self) -> bool {
        self.endpoints().is_some()
    }

    /// Distance between the two ends, if both are still alive
    pub fn length(&self) -> Option<f32> {
        let (a, b) = self.endpoints()?;
        let (pos_a, pos_b) = (a.borrow().position(), b.borrow().position());
        Some(distance(pos_a, pos_b))
    }

    pub fn desired_length(&self) -> f32 {
        self.desired_length
    }

    pub fn rigidity(&self) -> f32 {
        self.rigidity
    }

    pub fn inputs(&self) -> &AxonInputs {
        &self.inputs
    }

    /// The last committed forces on the first and second end
    pub fn forces(&self) -> (Force, Force) {
        (self.tension.force_a.get(), self.tension.force_b.get())
    }

    /// The force this muscle currently exerts on `body`
    pub fn force_on(&self, body: BodyId) -> Force {
        self.tension.force_on(body)
    }

    fn endpoints(&self) -> Option<(BodyRef, BodyRef)> {
        let ends = self.ends.as_ref()?;
        Some((ends.a.upgrade()?, ends.b.upgrade()?))
    }
}

impl Node for Muscle {
    fn update(&mut self) {
        let requested = self.inputs.first().unwrap_or(self.lengths.rest_length);
        self.desired_length = self.lengths.clamp(requested);
    }

    fn commit(&mut self) {
        let Some((a, b)) = self.endpoints() else {
            self.tension.force_a.set(Force::ZERO);
            self.tension.force_b.set(Force::ZERO);
            return;
        };

        let (pos_a, pos_b) = (a.borrow().position(), b.borrow().position());
        let difference = self.desired_length - distance(pos_a, pos_b);
        let strength = self.rigidity * difference / 2.0;

        // Along the axis through both ends, away from the other end:
        // a short muscle pushes its ends apart, a long one pulls them in.
        let away_from_b = pos_a - pos_b;
        let away_from_a = pos_b - pos_a;
        self.tension
            .force_a
            .set(force_in_direction(away_from_b.x, away_from_b.y, strength));
        self.tension
            .force_b
            .set(force_in_direction(away_from_a.x, away_from_a.y, strength));

        trace!(
            desired_length = self.desired_length,
            difference = difference,
            strength = strength,
            "Muscle tension committed"
        );
    }

    fn type_name(&self) -> &'static str {
        "Muscle"
    }

    fn inputs_mut(&mut self) -> Option<&mut AxonInputs> {
        Some(&mut self.inputs)
    }

    fn as_muscle(&self) -> Option<&Muscle> {
        Some(self)
    }

    fn as_muscle_mut(&mut self) -> Option<&mut Muscle> {
        Some(self)
    }
}
