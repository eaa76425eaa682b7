//! Core types and utilities for the evol creature simulation.

pub mod types;
pub mod config;
pub mod error;
pub mod force;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use force::*;
