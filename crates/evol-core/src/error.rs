//! Error types for the simulation.

use crate::types::MAX_EXACT_TICK;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Part '{0}' does not produce an axon output")]
    NotAnAxon(String),

    #[error("Part '{0}' cannot take axon inputs")]
    NoInputs(String),

    #[error("Part '{0}' is not a muscle")]
    NotAMuscle(String),

    #[error("Invalid mass: {0} (mass must be positive)")]
    InvalidMass(f32),

    #[error("Tick {0} is past the last exactly representable tick {}", MAX_EXACT_TICK)]
    TickLimit(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Scene error: {0}")]
    Scene(String),
}

impl Error {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
