//! The creature's computational graph.
//!
//! Every part of a creature is a [`Node`] driven through two phases per
//! tick: `update()` stages a new result from the values other nodes have
//! already committed, then `commit()` publishes it. Because no node can see
//! another's staged value during the update phase, the order in which nodes
//! are visited never changes the outcome, even when the graph has cycles.

pub mod axon;
pub mod creature;
pub mod inputs;
pub mod muscle;
pub mod node;

pub use axon::{
    AddAxon, Axon, AxonFunction, ConstAxon, Constant, Difference, SubAxon, Sum, Time, TimeAxon,
};
pub use creature::Creature;
pub use inputs::{AxonInputs, AxonLink, AxonOutput};
pub use muscle::Muscle;
pub use node::{Node, NodeRef};
