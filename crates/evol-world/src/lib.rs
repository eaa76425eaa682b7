//! Scene assembly and the tick driver that runs a creature against its bodies.

pub mod report;
pub mod scene;
pub mod simulation;

pub use report::{BodyReport, PartReport, Reading, StateReport};
pub use scene::{parse, Scene, SceneDescription, DEMO_SCENE};
pub use simulation::{Simulation, SimulationResult};
