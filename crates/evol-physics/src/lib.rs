//! Point-mass physics for creature bodies.
//!
//! Bodies gather force contributions from attached [`ForceSource`]s and
//! advance with semi-implicit Euler integration at a fixed time step.

pub mod body;
pub mod mass;
pub mod source;

pub use body::{BodyRef, BodyState, PhysicalBody};
pub use mass::{BallEnd, FixedMass, MassModel};
pub use source::ForceSource;
