//! Mass models for physical bodies.

use evol_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supplies a body's mass; queried on every integration step
pub trait MassModel: fmt::Debug {
    fn mass(&self) -> f32;
}

/// The end of a limb: a unit-mass ball
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BallEnd;

impl MassModel for BallEnd {
    fn mass(&self) -> f32 {
        1.0
    }
}

/// A constant, positive mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedMass(f32);

impl FixedMass {
    pub fn new(mass: f32) -> Result<Self> {
        if mass.is_finite() && mass > 0.0 {
            Ok(Self(mass))
        } else {
            Err(Error::InvalidMass(mass))
        }
    }
}

impl MassModel for FixedMass {
    fn mass(&self) -> f32 {
        self.0
    }
}
