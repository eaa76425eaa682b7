//! Axon outputs and the ordered input lists that read them.

use std::cell::Cell;
use std::rc::{Rc, Weak};

/// The committed output of an axon.
///
/// Only the owning axon holds the cell. Everything that reads it, inputs
/// and observers alike, holds an [`AxonLink`], so once the axon is dropped
/// every link to it goes dead.
#[derive(Debug, Default)]
pub struct AxonOutput(Rc<Cell<f32>>);

impl AxonOutput {
    pub fn new(initial: f32) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    /// The last committed value
    pub fn value(&self) -> f32 {
        self.0.get()
    }

    pub(crate) fn publish(&self, value: f32) {
        self.0.set(value);
    }

    pub fn link(&self) -> AxonLink {
        AxonLink(Rc::downgrade(&self.0))
    }
}

/// Non-owning reference to another axon's committed output
#[derive(Debug, Clone)]
pub struct AxonLink(Weak<Cell<f32>>);

impl AxonLink {
    /// The linked axon's committed value, or `None` once the axon is gone
    pub fn value(&self) -> Option<f32> {
        self.0.upgrade().map(|cell| cell.get())
    }

    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// Ordered, append-only list of axon inputs
#[derive(Debug, Clone, Default)]
pub struct AxonInputs {
    links: Vec<AxonLink>,
}

impl AxonInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, link: AxonLink) {
        self.links.push(link);
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Committed values of the live inputs, in insertion order
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.links.iter().filter_map(AxonLink::value)
    }

    /// Committed value of the first live input
    pub fn first(&self) -> Option<f32> {
        self.values().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_reads_committed_value() {
        let output = AxonOutput::new(0.0);
        let link = output.link();
        assert_eq!(link.value(), Some(0.0));

        output.publish(3.5);
        assert_eq!(link.value(), Some(3.5));
    }

    #[test]
    fn test_link_does_not_keep_output_alive() {
        let output = AxonOutput::new(1.0);
        let link = output.link();
        drop(output);
        assert!(!link.is_live());
        assert_eq!(link.value(), None);
    }

    #[test]
    fn test_inputs_keep_insertion_order_and_skip_dead() {
        let a = AxonOutput::new(1.0);
        let b = AxonOutput::new(2.0);
        let c = AxonOutput::new(3.0);

        let mut inputs = AxonInputs::new();
        inputs.push(a.link());
        inputs.push(b.link());
        inputs.push(c.link());
        assert_eq!(inputs.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(inputs.first(), Some(1.0));

        drop(a);
        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs.values().collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(inputs.first(), Some(2.0));
    }
}
