//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Unique identifier for a physical body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub Uuid);

impl BodyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BodyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest tick a TimeAxon reports exactly; beyond it `f32` skips values.
pub const MAX_EXACT_TICK: u64 = 1 << 24;

/// The run's tick counter.
///
/// Owned by the driver, which is the only writer. Readers hold a
/// [`TickReader`] and observe the counter change between ticks.
#[derive(Debug, Default)]
pub struct TickCounter {
    ticks: Rc<Cell<u64>>,
}

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A counter resuming at `tick`
    pub fn starting_at(tick: u64) -> Self {
        Self {
            ticks: Rc::new(Cell::new(tick)),
        }
    }

    pub fn get(&self) -> u64 {
        self.ticks.get()
    }

    /// Move to the next tick
    pub fn advance(&mut self) {
        self.ticks.set(self.ticks.get() + 1);
    }

    pub fn reader(&self) -> TickReader {
        TickReader {
            ticks: Rc::clone(&self.ticks),
        }
    }
}

/// Read-only view of a [`TickCounter`]
#[derive(Debug, Clone)]
pub struct TickReader {
    ticks: Rc<Cell<u64>>,
}

impl TickReader {
    pub fn get(&self) -> u64 {
        self.ticks.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_follows_counter() {
        let mut counter = TickCounter::new();
        let reader = counter.reader();
        assert_eq!(reader.get(), 0);

        counter.advance();
        counter.advance();
        assert_eq!(counter.get(), 2);
        assert_eq!(reader.get(), 2);
        assert_eq!(reader.clone().get(), 2);
    }

    #[test]
    fn test_counter_starting_at() {
        let mut counter = TickCounter::starting_at(MAX_EXACT_TICK);
        let reader = counter.reader();
        counter.advance();
        assert_eq!(reader.get(), MAX_EXACT_TICK + 1);
    }

    #[test]
    fn test_body_ids_unique() {
        assert_ne!(BodyId::new(), BodyId::new());
    }
}
