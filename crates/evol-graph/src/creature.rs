//! A creature: the named collection of nodes that make up one simulated organism.

use crate::inputs::AxonLink;
use crate::node::{Node, NodeRef};
use evol_core::{Error, Result};
use evol_physics::BodyRef;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

/// Owns every node by name and drives the whole-graph tick
#[derive(Default)]
pub struct Creature {
    parts: HashMap<String, NodeRef>,
}

impl Creature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `name`, replacing any node already there
    pub fn add(&mut self, name: impl Into<String>, node: impl Node + 'static) -> NodeRef {
        let node: NodeRef = Rc::new(RefCell::new(node));
        self.add_shared(name, Rc::clone(&node));
        node
    }

    /// Insert an already shared node under `name`
    pub fn add_shared(&mut self, name: impl Into<String>, node: NodeRef) {
        let name = name.into();
        debug!(part = %name, kind = node.borrow().type_name(), "Adding part");
        if self.parts.insert(name.clone(), node).is_some() {
            warn!(part = %name, "Replaced existing part; links to its old output are now dead");
        }
    }

    pub fn get_part_named(&self, name: &str) -> Option<NodeRef> {
        self.parts.get(name).cloned()
    }

    /// A link to the committed output of the part named `name`, if it is an
    /// axon. Holding the link does not keep the part alive.
    pub fn get_axon_named(&self, name: &str) -> Option<AxonLink> {
        self.parts.get(name).and_then(|part| part.borrow().output())
    }

    /// The committed output value of the axon named `name`
    pub fn axon_value(&self, name: &str) -> Option<f32> {
        self.get_axon_named(name).and_then(|link| link.value())
    }

    /// Append the axon `input` to the input list of the part `base`.
    ///
    /// Fails without changing anything if `input` is missing or not an
    /// axon, or if `base` is missing or does not accept inputs.
    pub fn add_axon_as_input_to(&mut self, input: &str, base: &str) -> Result<()> {
        let input_part = self
            .parts
            .get(input)
            .ok_or_else(|| Error::NotFound(input.to_string()))?;
        let link = input_part
            .borrow()
            .output()
            .ok_or_else(|| Error::NotAnAxon(input.to_string()))?;

        let base_part = self
            .parts
            .get(base)
            .ok_or_else(|| Error::NotFound(base.to_string()))?;
        let mut base_node = base_part.borrow_mut();
        let inputs = base_node
            .inputs_mut()
            .ok_or_else(|| Error::NoInputs(base.to_string()))?;
        inputs.push(link);

        debug!(input = %input, base = %base, input_count = inputs.len(), "Wired axon input");
        Ok(())
    }

    /// Connect the muscle named `name` between two bodies
    pub fn connect_muscle(&mut self, name: &str, a: &BodyRef, b: &BodyRef) -> Result<()> {
        let part = self
            .parts
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let mut node = part.borrow_mut();
        let muscle = node
            .as_muscle_mut()
            .ok_or_else(|| Error::NotAMuscle(name.to_string()))?;
        muscle.connect_ends(a, b);

        debug!(muscle = %name, "Connected muscle ends");
        Ok(())
    }

    /// One whole-creature tick: every node updates, then every node commits
    pub fn update(&mut self) {
        self.update_all();
        self.commit_all();
    }

    /// First phase: every node stages a result from committed values only
    pub fn update_all(&mut self) {
        for part in self.parts.values() {
            part.borrow_mut().update();
        }
    }

    /// Second phase: every node publishes its staged result
    pub fn commit_all(&mut self) {
        for part in self.parts.values() {
            part.borrow_mut().commit();
        }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeRef)> + '_ {
        self.parts.iter().map(|(name, part)| (name.as_str(), part))
    }

    /// Part names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
