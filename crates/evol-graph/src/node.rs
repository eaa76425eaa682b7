//! The two-phase node contract.

use crate::inputs::{AxonInputs, AxonLink};
use crate::muscle::Muscle;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a node; the owning [`Creature`](crate::Creature) holds the canonical one
pub type NodeRef = Rc<RefCell<dyn Node>>;

/// A simulated part of a creature.
///
/// All calculation happens in `update()`, which may only read values that
/// were committed on a previous tick. `commit()` locks the staged result in.
/// The capability queries default to "absent" and are overridden by the
/// kinds that have them.
pub trait Node {
    /// Compute and stage a new result
    fn update(&mut self);

    /// Publish the result staged by the last `update()`
    fn commit(&mut self);

    /// Fixed label for the concrete kind
    fn type_name(&self) -> &'static str;

    /// A non-owning link to the committed output, if this node is an axon
    fn output(&self) -> Option<AxonLink> {
        None
    }

    /// The input list, if this node accepts axon inputs
    fn inputs_mut(&mut self) -> Option<&mut AxonInputs> {
        None
    }

    fn as_muscle(&self) -> Option<&Muscle> {
        None
    }

    fn as_muscle_mut(&mut self) -> Option<&mut Muscle> {
        None
    }
}
