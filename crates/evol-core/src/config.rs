//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::MAX_EXACT_TICK;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Physical body defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Mass given to bodies that do not name one
    pub default_mass: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self { default_mass: 1.0 }
    }
}

/// Muscle target length limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MuscleConfig {
    /// Shortest length a driving axon can request
    pub min_length: f32,
    /// Longest length a driving axon can request
    pub max_length: f32,
    /// Target length of a muscle with no driving axon
    pub rest_length: f32,
}

impl Default for MuscleConfig {
    fn default() -> Self {
        Self {
            min_length: 0.5,
            max_length: 1.5,
            rest_length: 1.0,
        }
    }
}

impl MuscleConfig {
    /// Clamp a requested length into `[min_length, max_length]`
    pub fn clamp(&self, requested: f32) -> f32 {
        requested.max(self.min_length).min(self.max_length)
    }

    /// Lengths must be finite with `min_length <= rest_length <= max_length`
    pub fn validate(&self) -> Result<()> {
        let lengths = [self.min_length, self.rest_length, self.max_length];
        let ordered = self.min_length <= self.rest_length && self.rest_length <= self.max_length;
        if lengths.iter().all(|length| length.is_finite()) && ordered {
            Ok(())
        } else {
            Err(Error::InvalidConfig(format!(
                "muscle lengths must satisfy min <= rest <= max, got {} / {} / {}",
                self.min_length, self.rest_length, self.max_length
            )))
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to run the simulation
    pub num_ticks: u64,
    /// Ticks per simulated time unit; a larger number slows acceleration and movement
    pub time_rate: f32,
    /// Log a state report every this many ticks (0 disables)
    pub report_interval: u64,
    /// Body configuration
    pub body: BodyConfig,
    /// Muscle configuration
    pub muscle: MuscleConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ticks: 10_000,
            time_rate: 50.0,
            report_interval: 1000,
            body: BodyConfig::default(),
            muscle: MuscleConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Length of one tick in simulated time units
    pub fn time_step(&self) -> f32 {
        1.0 / self.time_rate
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_ticks > MAX_EXACT_TICK {
            return Err(Error::TickLimit(self.num_ticks));
        }

        if !(self.time_rate.is_finite() && self.time_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "time_rate must be positive, got {}",
                self.time_rate
            )));
        }

        if self.body.default_mass.is_nan() || self.body.default_mass <= 0.0 {
            return Err(Error::InvalidMass(self.body.default_mass));
        }

        self.muscle.validate()
    }
}
