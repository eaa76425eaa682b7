//! Axons: nodes that turn their inputs' committed outputs into a new scalar.
//!
//! An [`Axon`] keeps two values. The committed one is what every reader
//! sees; the staged one is computed in `update()` and only becomes visible
//! on `commit()`. The kind-specific part is an [`AxonFunction`], so new
//! kinds can be added outside this crate.

use crate::inputs::{AxonInputs, AxonLink, AxonOutput};
use crate::node::Node;
use evol_core::TickReader;

/// The calculation an axon performs each tick
pub trait AxonFunction {
    /// Label reported by the axon's `type_name()`
    const KIND: &'static str;

    /// Compute a new output from the inputs' committed values
    fn evaluate(&self, inputs: &AxonInputs) -> f32;
}

/// A node producing a scalar output
#[derive(Debug)]
pub struct Axon<F> {
    function: F,
    inputs: AxonInputs,
    output: AxonOutput,
    staged: f32,
}

impl<F: AxonFunction> Axon<F> {
    pub fn with_function(function: F) -> Self {
        Self {
            function,
            inputs: AxonInputs::new(),
            output: AxonOutput::new(0.0),
            staged: 0.0,
        }
    }

    /// The committed output; never the value staged this tick
    pub fn output_value(&self) -> f32 {
        self.output.value()
    }

    pub fn staged_value(&self) -> f32 {
        self.staged
    }

    pub fn inputs(&self) -> &AxonInputs {
        &self.inputs
    }

    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<F: AxonFunction> Node for Axon<F> {
    fn update(&mut self) {
        self.staged = self.function.evaluate(&self.inputs);
    }

    fn commit(&mut self) {
        self.output.publish(self.staged);
    }

    fn type_name(&self) -> &'static str {
        F::KIND
    }

    fn output(&self) -> Option<AxonLink> {
        Some(self.output.link())
    }

    fn inputs_mut(&mut self) -> Option<&mut AxonInputs> {
        Some(&mut self.inputs)
    }
}

/// Outputs a fixed value; inputs are ignored
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub f32);

impl AxonFunction for Constant {
    const KIND: &'static str = "ConstAxon";

    fn evaluate(&self, _inputs: &AxonInputs) -> f32 {
        self.0
    }
}

/// Outputs the run's current tick; inputs are ignored.
///
/// Ticks are exact up to [`MAX_EXACT_TICK`](evol_core::MAX_EXACT_TICK), which
/// `SimulationConfig::validate` enforces for a run.
#[derive(Debug, Clone)]
pub struct Time(pub TickReader);

impl AxonFunction for Time {
    const KIND: &'static str = "TimeAxon";

    fn evaluate(&self, _inputs: &AxonInputs) -> f32 {
        self.0.get() as f32
    }
}

/// Sum of all inputs, accumulated in insertion order
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl AxonFunction for Sum {
    const KIND: &'static str = "AddAxon";

    fn evaluate(&self, inputs: &AxonInputs) -> f32 {
        inputs.values().fold(0.0, |total, value| total + value)
    }
}

/// The first input minus every later input; zero with no inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct Difference;

impl AxonFunction for Difference {
    const KIND: &'static str = "SubAxon";

    fn evaluate(&self, inputs: &AxonInputs) -> f32 {
        let mut values = inputs.values();
        match values.next() {
            Some(base) => values.fold(base, |total, value| total - value),
            None => 0.0,
        }
    }
}

pub type ConstAxon = Axon<Constant>;
pub type TimeAxon = Axon<Time>;
pub type AddAxon = Axon<Sum>;
pub type SubAxon = Axon<Difference>;

impl ConstAxon {
    pub fn new(value: f32) -> Self {
        Self::with_function(Constant(value))
    }
}

impl TimeAxon {
    pub fn new(ticks: TickReader) -> Self {
        Self::with_function(Time(ticks))
    }
}

impl AddAxon {
    pub fn new() -> Self {
        Self::with_function(Sum)
    }
}

impl Default for AddAxon {
    fn default() -> Self {
        Self::new()
    }
}

impl SubAxon {
    pub fn new() -> Self {
        Self::with_function(Difference)
    }
}

impl Default for SubAxon {
    fn default() -> Self {
        Self::new()
    }
}
