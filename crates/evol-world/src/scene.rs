//! Scene descriptions: a small text format naming a creature's nodes, its
//! bodies, and how they are wired together.
//!
//! ```text
//! nodes {
//!   C c1 0.5        # constant axon
//!   T t1            # time axon
//!   A a1            # add axon
//!   S s1            # sub axon
//!   M m1 2.0        # muscle with rigidity 2.0
//! }
//! bodies {
//!   ball b1 0.0 0.0
//!   ball b2 1.5 0.0 2.0   # optional mass
//! }
//! connections {
//!   t1 -> a1
//!   a1 -> m1
//! }
//! muscles {
//!   m1 : b1 b2
//! }
//! ```

use evol_core::{Error, Result, SimulationConfig, TickCounter};
use evol_graph::{AddAxon, ConstAxon, Creature, Muscle, SubAxon, TimeAxon};
use evol_physics::{BodyRef, FixedMass, PhysicalBody};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A small reference scene: time axons feeding a
/// self-referencing sum, an oscillating difference driving one muscle
/// between two balls.
pub const DEMO_SCENE: &str = "\
nodes {
  C c1 1.0
  T t1
  T t2
  A a1
  S s1
  S s2
  M m1 1.0
}
bodies {
  ball objectA 0.0 0.0
  ball objectB 9.0 9.0
}
connections {
  t1 -> a1
  t2 -> a1
  a1 -> a1
  a1 -> s1
  t1 -> s1
  c1 -> s2
  s2 -> s2
  s2 -> c1
  s2 -> m1
}
muscles {
  m1 : objectA objectB
}
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Const { value: f32 },
    Time,
    Add,
    Sub,
    Muscle { rigidity: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Falls back to the configured default mass
    #[serde(default)]
    pub mass: Option<f32>,
}

/// `input -> base`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub input: String,
    pub base: String,
}

/// `muscle : a b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleEnds {
    pub muscle: String,
    pub a: String,
    pub b: String,
}

/// Everything a scene file names, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub nodes: Vec<NodeSpec>,
    pub bodies: Vec<BodySpec>,
    pub connections: Vec<Connection>,
    pub muscles: Vec<MuscleEnds>,
}

/// An assembled scene, ready to be handed to a [`Simulation`](crate::Simulation)
pub struct Scene {
    pub creature: Creature,
    pub bodies: Vec<(String, BodyRef)>,
    pub ticks: TickCounter,
}

impl Scene {
    pub fn body_named(&self, name: &str) -> Option<&BodyRef> {
        self.bodies
            .iter()
            .find(|(body_name, _)| body_name == name)
            .map(|(_, body)| body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Nodes,
    Bodies,
    Connections,
    Muscles,
}

impl Block {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nodes" => Some(Block::Nodes),
            "bodies" => Some(Block::Bodies),
            "connections" => Some(Block::Connections),
            "muscles" => Some(Block::Muscles),
            _ => None,
        }
    }
}

/// Parse the text format into a [`SceneDescription`]
pub fn parse(text: &str) -> Result<SceneDescription> {
    let mut scene = SceneDescription::default();
    let mut current: Option<(Block, usize)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if line == "}" {
            if current.take().is_none() {
                return Err(Error::parse(line_no, "unmatched '}'"));
            }
            continue;
        }

        if let Some(header) = line.strip_suffix('{') {
            if let Some((_, opened)) = current {
                return Err(Error::parse(
                    line_no,
                    format!("block opened on line {opened} is not closed"),
                ));
            }
            let name = header.trim();
            let block = Block::from_name(name)
                .ok_or_else(|| Error::parse(line_no, format!("unknown block '{name}'")))?;
            current = Some((block, line_no));
            continue;
        }

        let Some((block, _)) = current else {
            return Err(Error::parse(line_no, "entry outside of a block"));
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match block {
            Block::Nodes => scene.nodes.push(parse_node(&tokens, line_no)?),
            Block::Bodies => scene.bodies.push(parse_body(&tokens, line_no)?),
            Block::Connections => scene.connections.push(parse_connection(&tokens, line_no)?),
            Block::Muscles => scene.muscles.push(parse_muscle_ends(&tokens, line_no)?),
        }
    }

    if let Some((_, opened)) = current {
        return Err(Error::parse(opened, "block is not closed before end of input"));
    }

    debug!(
        nodes = scene.nodes.len(),
        bodies = scene.bodies.len(),
        connections = scene.connections.len(),
        muscles = scene.muscles.len(),
        "Parsed scene description"
    );
    Ok(scene)
}

fn parse_number(token: &str, what: &str, line_no: usize) -> Result<f32> {
    token
        .parse::<f32>()
        .map_err(|_| Error::parse(line_no, format!("invalid {what} '{token}'")))
}

fn expect_arity(tokens: &[&str], counts: &[usize], usage: &str, line_no: usize) -> Result<()> {
    if counts.contains(&tokens.len()) {
        Ok(())
    } else {
        Err(Error::parse(line_no, format!("expected '{usage}'")))
    }
}

fn parse_node(tokens: &[&str], line_no: usize) -> Result<NodeSpec> {
    let code = tokens[0];
    let kind = match code.to_ascii_lowercase().as_str() {
        "c" | "const" => {
            expect_arity(tokens, &[3], "C <name> <value>", line_no)?;
            NodeKind::Const {
                value: parse_number(tokens[2], "constant", line_no)?,
            }
        }
        "t" | "time" => {
            expect_arity(tokens, &[2], "T <name>", line_no)?;
            NodeKind::Time
        }
        "a" | "add" => {
            expect_arity(tokens, &[2], "A <name>", line_no)?;
            NodeKind::Add
        }
        "s" | "sub" => {
            expect_arity(tokens, &[2], "S <name>", line_no)?;
            NodeKind::Sub
        }
        "m" | "muscle" => {
            expect_arity(tokens, &[3], "M <name> <rigidity>", line_no)?;
            NodeKind::Muscle {
                rigidity: parse_number(tokens[2], "rigidity", line_no)?,
            }
        }
        _ => return Err(Error::parse(line_no, format!("unknown node type '{code}'"))),
    };

    Ok(NodeSpec {
        name: tokens[1].to_string(),
        kind,
    })
}

fn parse_body(tokens: &[&str], line_no: usize) -> Result<BodySpec> {
    expect_arity(tokens, &[4, 5], "ball <name> <x> <y> [mass]", line_no)?;
    if !tokens[0].eq_ignore_ascii_case("ball") {
        return Err(Error::parse(
            line_no,
            format!("unknown body type '{}'", tokens[0]),
        ));
    }

    let mass = tokens
        .get(4)
        .map(|token| parse_number(token, "mass", line_no))
        .transpose()?;
    Ok(BodySpec {
        name: tokens[1].to_string(),
        x: parse_number(tokens[2], "x position", line_no)?,
        y: parse_number(tokens[3], "y position", line_no)?,
        mass,
    })
}

fn parse_connection(tokens: &[&str], line_no: usize) -> Result<Connection> {
    match tokens {
        [input, "->", base] => Ok(Connection {
            input: input.to_string(),
            base: base.to_string(),
        }),
        _ => Err(Error::parse(line_no, "expected '<input> -> <base>'")),
    }
}

fn parse_muscle_ends(tokens: &[&str], line_no: usize) -> Result<MuscleEnds> {
    match tokens {
        [muscle, ":", a, b] => Ok(MuscleEnds {
            muscle: muscle.to_string(),
            a: a.to_string(),
            b: b.to_string(),
        }),
        _ => Err(Error::parse(line_no, "expected '<muscle> : <body> <body>'")),
    }
}

impl SceneDescription {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Assemble the scene: add every node, create the bodies, wire the
    /// connections and attach the muscles, in that order.
    pub fn build(&self, config: &SimulationConfig) -> Result<Scene> {
        config.validate()?;
        let ticks = TickCounter::new();
        let mut creature = Creature::new();

        for node in &self.nodes {
            let name = node.name.as_str();
            match node.kind {
                NodeKind::Const { value } => creature.add(name, ConstAxon::new(value)),
                NodeKind::Time => creature.add(name, TimeAxon::new(ticks.reader())),
                NodeKind::Add => creature.add(name, AddAxon::new()),
                NodeKind::Sub => creature.add(name, SubAxon::new()),
                NodeKind::Muscle { rigidity } => {
                    creature.add(name, Muscle::with_lengths(rigidity, config.muscle.clone())?)
                }
            };
        }

        let mut bodies: Vec<(String, BodyRef)> = Vec::with_capacity(self.bodies.len());
        for spec in &self.bodies {
            if bodies.iter().any(|(name, _)| *name == spec.name) {
                return Err(Error::Scene(format!("duplicate body '{}'", spec.name)));
            }
            let mass = FixedMass::new(spec.mass.unwrap_or(config.body.default_mass))?;
            let body = PhysicalBody::new(Vec2::new(spec.x, spec.y), mass)?;
            bodies.push((spec.name.clone(), body.into_ref()));
        }

        for connection in &self.connections {
            creature
                .add_axon_as_input_to(&connection.input, &connection.base)
                .map_err(|e| {
                    Error::Scene(format!(
                        "cannot connect {} -> {}: {}",
                        connection.input, connection.base, e
                    ))
                })?;
        }

        for ends in &self.muscles {
            let find = |name: &str| {
                bodies
                    .iter()
                    .find(|(body_name, _)| body_name == name)
                    .map(|(_, body)| body.clone())
                    .ok_or_else(|| Error::Scene(format!("unknown body '{name}'")))
            };
            let (a, b) = (find(&ends.a)?, find(&ends.b)?);
            creature
                .connect_muscle(&ends.muscle, &a, &b)
                .map_err(|e| Error::Scene(format!("cannot attach {}: {}", ends.muscle, e)))?;
        }

        debug!(parts = creature.len(), bodies = bodies.len(), "Scene assembled");
        Ok(Scene {
            creature,
            bodies,
            ticks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo_scene() {
        let scene = parse(DEMO_SCENE).unwrap();
        assert_eq!(scene.nodes.len(), 7);
        assert_eq!(scene.bodies.len(), 2);
        assert_eq!(scene.connections.len(), 9);
        assert_eq!(scene.muscles.len(), 1);

        assert_eq!(
            scene.nodes[0],
            NodeSpec {
                name: "c1".to_string(),
                kind: NodeKind::Const { value: 1.0 }
            }
        );
        assert_eq!(scene.nodes[6].kind, NodeKind::Muscle { rigidity: 1.0 });
        assert_eq!(
            scene.connections[0],
            Connection {
                input: "t1".to_string(),
                base: "a1".to_string()
            }
        );
        assert_eq!(scene.bodies[1].x, 9.0);
        assert_eq!(scene.bodies[1].mass, None);
    }

    #[test]
    fn test_parse_comments_and_long_codes() {
        let text = "
            # a creature
            Nodes {
              Const k 2   # value
              add total
            }
            connections {
              k -> total
            }
            bodies {
              ball heavy 1 2 5.0
            }
        ";
        let scene = parse(text).unwrap();
        assert_eq!(scene.nodes[0].kind, NodeKind::Const { value: 2.0 });
        assert_eq!(scene.nodes[1].kind, NodeKind::Add);
        assert_eq!(scene.bodies[0].mass, Some(5.0));
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let cases = [
            ("nodes {\n  X x1\n}", 2),
            ("nodes {\n  C c1 abc\n}", 2),
            ("nodes {\n  T\n}", 2),
            ("C c1 1.0", 1),
            ("}", 1),
            ("widgets {\n}", 1),
            ("nodes {\n  T t1\n", 1),
            ("nodes {\n  connections {\n}", 2),
            ("connections {\n  a => b\n}", 2),
            ("muscles {\n  m1 b1 b2\n}", 2),
            ("bodies {\n  cube b1 0 0\n}", 2),
        ];

        for (text, expected_line) in cases {
            match parse(text) {
                Err(Error::Parse { line, .. }) => assert_eq!(line, expected_line, "{text:?}"),
                other => panic!("expected parse error for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_build_demo_scene() {
        let scene = parse(DEMO_SCENE)
            .unwrap()
            .build(&SimulationConfig::default())
            .unwrap();
        assert_eq!(scene.creature.len(), 7);
        assert_eq!(scene.bodies.len(), 2);

        let muscle = scene.creature.get_part_named("m1").unwrap();
        assert_eq!(muscle.borrow().as_muscle().unwrap().inputs().len(), 1);
        assert!(muscle.borrow().as_muscle().unwrap().is_connected());
        assert_eq!(scene.body_named("objectA").unwrap().borrow().force_source_count(), 1);
    }

    #[test]
    fn test_build_reports_wiring_failures() {
        let text = "nodes {\n  A a1\n}\nconnections {\n  ghost -> a1\n}";
        let err = parse(text)
            .unwrap()
            .build(&SimulationConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Scene(ref msg) if msg.contains("ghost")));
    }

    #[test]
    fn test_build_rejects_bad_bodies() {
        let config = SimulationConfig::default();

        let unknown = "nodes {\n  M m1 1\n}\nbodies {\n  ball b1 0 0\n}\nmuscles {\n  m1 : b1 b2\n}";
        assert!(matches!(
            parse(unknown).unwrap().build(&config),
            Err(Error::Scene(_))
        ));

        let duplicate = "bodies {\n  ball b1 0 0\n  ball b1 1 1\n}";
        assert!(matches!(
            parse(duplicate).unwrap().build(&config),
            Err(Error::Scene(_))
        ));

        let weightless = "bodies {\n  ball b1 0 0 0.0\n}";
        assert!(matches!(
            parse(weightless).unwrap().build(&config),
            Err(Error::InvalidMass(_))
        ));
    }

    #[test]
    fn test_json_description() {
        let json = r#"{
            "nodes": [
                { "name": "c1", "kind": "const", "value": 0.75 },
                { "name": "m1", "kind": "muscle", "rigidity": 3.0 }
            ],
            "connections": [ { "input": "c1", "base": "m1" } ]
        }"#;
        let scene = SceneDescription::from_json_str(json).unwrap();
        assert_eq!(scene.nodes[0].kind, NodeKind::Const { value: 0.75 });
        assert!(scene.bodies.is_empty());
        assert!(scene.build(&SimulationConfig::default()).is_ok());
    }
}
