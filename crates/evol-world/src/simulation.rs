//! Tick driver for an assembled scene.

use crate::report::StateReport;
use crate::scene::Scene;
use evol_core::{total_force, Error, Force, Result, SimulationConfig, TickCounter, MAX_EXACT_TICK};
use evol_graph::Creature;
use evol_physics::BodyRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

/// Runs a creature and its bodies forward one tick at a time.
///
/// Each step runs the whole-creature update/commit pass, so every muscle
/// has committed this tick's forces before any body integrates. The tick
/// counter advances last: the first step sees tick 0.
pub struct Simulation {
    creature: Creature,
    bodies: Vec<(String, BodyRef)>,
    ticks: TickCounter,
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(scene: Scene, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let Scene {
            creature,
            bodies,
            ticks,
        } = scene;

        Ok(Self {
            creature,
            bodies,
            ticks,
            config,
        })
    }

    /// Number of completed ticks
    pub fn tick(&self) -> u64 {
        self.ticks.get()
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub fn bodies(&self) -> &[(String, BodyRef)] {
        &self.bodies
    }

    pub fn body_named(&self, name: &str) -> Option<&BodyRef> {
        self.bodies
            .iter()
            .find(|(body_name, _)| body_name == name)
            .map(|(_, body)| body)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Execute one simulation step.
    ///
    /// The tick limit and every body's mass are checked before anything
    /// moves, so a failed step leaves the creature, the bodies and the
    /// counter as they were.
    pub fn step(&mut self) -> Result<()> {
        let tick = self.ticks.get();
        if tick > MAX_EXACT_TICK {
            return Err(Error::TickLimit(tick));
        }

        let masses = self
            .bodies
            .iter()
            .map(|(_, body)| body.borrow().checked_mass())
            .collect::<Result<Vec<_>>>()?;

        self.creature.update();

        let dt = self.config.time_step();
        for ((name, body), mass) in self.bodies.iter().zip(masses) {
            body.borrow_mut().integrate_with_mass(dt, mass);
            trace!(body = %name, tick, "Body stepped");
        }

        self.ticks.advance();
        Ok(())
    }

    /// Run the simulation for the configured number of ticks
    #[instrument(skip(self), fields(num_ticks = self.config.num_ticks))]
    pub fn run(&mut self) -> Result<SimulationResult> {
        info!(
            "Starting simulation for {} ticks with {} parts and {} bodies",
            self.config.num_ticks,
            self.creature.len(),
            self.bodies.len()
        );

        for _ in 0..self.config.num_ticks {
            self.step()?;

            let interval = self.config.report_interval;
            if interval > 0 && self.tick() % interval == 0 {
                info!(tick = self.tick(), "State report\n{}", self.report());
            }
        }

        self.emit_summary();

        Ok(SimulationResult {
            total_ticks: self.tick(),
            final_state: self.report(),
        })
    }

    pub fn report(&self) -> StateReport {
        StateReport::capture(self.tick(), &self.creature, &self.bodies)
    }

    /// Sum of the forces on every body; zero when all forces come in opposing pairs
    pub fn net_force(&self) -> Force {
        total_force(self.bodies.iter().map(|(_, body)| body.borrow().net_force()))
    }

    /// Total kinetic energy of all bodies
    pub fn kinetic_energy(&self) -> f32 {
        self.bodies
            .iter()
            .map(|(_, body)| {
                let body = body.borrow();
                0.5 * body.mass() * body.velocity().length_squared()
            })
            .sum()
    }

    fn emit_summary(&self) {
        let net_force = self.net_force();
        info!(
            event = "simulation_summary",
            total_ticks = self.tick(),
            parts = self.creature.len(),
            bodies = self.bodies.len(),
            kinetic_energy = self.kinetic_energy(),
            net_force_x = net_force.x,
            net_force_y = net_force.y,
            "Simulation complete"
        );

        for (name, body) in &self.bodies {
            let body = body.borrow();
            debug!(
                event = "body_final_state",
                body = %name,
                position_x = body.position().x,
                position_y = body.position().y,
                velocity_x = body.velocity().x,
                velocity_y = body.velocity().y,
                "Final body state"
            );
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_ticks: u64,
    pub final_state: StateReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{parse, DEMO_SCENE};
    use evol_graph::{ConstAxon, Muscle, TimeAxon};
    use evol_physics::{MassModel, PhysicalBody};
    use glam::Vec2;
    use std::cell::Cell;

    /// Loses one unit of mass every time it is queried
    #[derive(Debug)]
    struct Evaporating(Cell<f32>);

    impl MassModel for Evaporating {
        fn mass(&self) -> f32 {
            let mass = self.0.get();
            self.0.set(mass - 1.0);
            mass
        }
    }

    fn simulation(text: &str, num_ticks: u64) -> Simulation {
        let config = SimulationConfig {
            num_ticks,
            report_interval: 0,
            ..Default::default()
        };
        let scene = parse(text).unwrap().build(&config).unwrap();
        Simulation::new(scene, config).unwrap()
    }

    #[test]
    fn test_simulation_creation() {
        let sim = simulation(DEMO_SCENE, 10);
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.creature().len(), 7);
        assert!(sim.body_named("objectA").is_some());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let scene = parse(DEMO_SCENE)
            .unwrap()
            .build(&SimulationConfig::default())
            .unwrap();
        let config = SimulationConfig {
            time_rate: -1.0,
            ..Default::default()
        };
        assert!(Simulation::new(scene, config).is_err());
    }

    #[test]
    fn test_run_counts_ticks() {
        let mut sim = simulation(DEMO_SCENE, 25);
        let result = sim.run().unwrap();
        assert_eq!(result.total_ticks, 25);
        assert_eq!(result.final_state.tick, 25);
        assert_eq!(result.final_state.parts.len(), 7);
    }

    #[test]
    fn test_time_axon_sees_tick_being_computed() {
        let mut sim = simulation("nodes {\n  T t1\n}", 0);
        for expected in 0..10u64 {
            sim.step().unwrap();
            let t1 = sim.creature().get_axon_named("t1").unwrap();
            assert_eq!(t1.value(), Some(expected as f32));
        }
        assert_eq!(sim.tick(), 10);
    }

    #[test]
    fn test_demo_scene_oscillating_driver() {
        let mut sim = simulation(DEMO_SCENE, 0);
        let s2 = sim.creature().get_axon_named("s2").unwrap();
        let mut seen = Vec::new();
        for _ in 0..6 {
            sim.step().unwrap();
            seen.push(s2.value().unwrap());
        }
        // s2 = c1 - s2, with c1 committed one tick late
        assert_eq!(seen, vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_failed_step_changes_nothing() {
        let mut creature = Creature::new();
        creature.add("c1", ConstAxon::new(2.0));
        creature.add("m1", Muscle::new(1.0));
        let a = PhysicalBody::ball(0.0, 0.0).into_ref();
        let b = PhysicalBody::new(Vec2::new(3.0, 0.0), Evaporating(Cell::new(1.0)))
            .unwrap()
            .into_ref();
        creature.connect_muscle("m1", &a, &b).unwrap();

        let scene = Scene {
            creature,
            bodies: vec![("a".to_string(), a), ("b".to_string(), b)],
            ticks: TickCounter::new(),
        };
        let mut sim = Simulation::new(scene, SimulationConfig::default()).unwrap();

        assert!(matches!(sim.step(), Err(Error::InvalidMass(_))));
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.creature().axon_value("c1"), Some(0.0));
        let a = sim.body_named("a").unwrap().borrow();
        assert_eq!(a.position(), Vec2::ZERO);
        assert_eq!(a.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_step_stops_at_tick_limit() {
        let ticks = TickCounter::starting_at(MAX_EXACT_TICK);
        let mut creature = Creature::new();
        creature.add("t1", TimeAxon::new(ticks.reader()));
        let scene = Scene {
            creature,
            bodies: Vec::new(),
            ticks,
        };
        let mut sim = Simulation::new(scene, SimulationConfig::default()).unwrap();

        sim.step().unwrap();
        assert_eq!(sim.creature().axon_value("t1"), Some(MAX_EXACT_TICK as f32));

        assert!(matches!(
            sim.step(),
            Err(Error::TickLimit(tick)) if tick == MAX_EXACT_TICK + 1
        ));
        assert_eq!(sim.tick(), MAX_EXACT_TICK + 1);
        assert_eq!(sim.creature().axon_value("t1"), Some(MAX_EXACT_TICK as f32));
    }
}
