//! Read-only snapshots of a running scene.

use evol_graph::Creature;
use evol_physics::BodyRef;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a part exposes to an observer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Reading {
    /// Committed axon output
    Output(f32),
    /// Current muscle length
    Length(f32),
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartReport {
    pub name: String,
    pub kind: String,
    pub reading: Reading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyReport {
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Parts sorted by name, bodies in scene order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub tick: u64,
    pub parts: Vec<PartReport>,
    pub bodies: Vec<BodyReport>,
}

impl StateReport {
    pub fn capture(tick: u64, creature: &Creature, bodies: &[(String, BodyRef)]) -> Self {
        let parts = creature
            .names()
            .into_iter()
            .filter_map(|name| {
                let part = creature.get_part_named(name)?;
                let node = part.borrow();
                let reading = if let Some(value) = node.output().and_then(|link| link.value()) {
                    Reading::Output(value)
                } else if let Some(length) = node.as_muscle().and_then(|m| m.length()) {
                    Reading::Length(length)
                } else {
                    Reading::None
                };
                Some(PartReport {
                    name: name.to_string(),
                    kind: node.type_name().to_string(),
                    reading,
                })
            })
            .collect();

        let bodies = bodies
            .iter()
            .map(|(name, body)| {
                let body = body.borrow();
                BodyReport {
                    name: name.clone(),
                    position: body.position(),
                    velocity: body.velocity(),
                }
            })
            .collect();

        Self {
            tick,
            parts,
            bodies,
        }
    }

    pub fn part(&self, name: &str) -> Option<&PartReport> {
        self.parts.iter().find(|part| part.name == name)
    }

    pub fn body(&self, name: &str) -> Option<&BodyReport> {
        self.bodies.iter().find(|body| body.name == name)
    }
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---------Tick {}---------", self.tick)?;
        for part in &self.parts {
            write!(f, "{}({})", part.name, part.kind)?;
            match part.reading {
                Reading::Output(value) => writeln!(f, " : {value}")?,
                Reading::Length(length) => writeln!(f, " : {length}L")?,
                Reading::None => writeln!(f)?,
            }
        }
        for body in &self.bodies {
            writeln!(
                f,
                "{} : ({}, {})",
                body.name, body.position.x, body.position.y
            )?;
        }
        Ok(())
    }
}
