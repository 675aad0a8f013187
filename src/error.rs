//! Error types for the simulation core

use crate::simulation::body::BodyId;
use thiserror::Error;

/// Errors produced by the simulation core
///
/// Everything else (probe misses, releasing a free body) is ordinary state
/// and never surfaces as an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A direction vector had (almost) no usable length, e.g. a facing vector
    /// pointing straight up when only its horizontal part is needed.
    #[error("direction vector is degenerate (length below {epsilon})")]
    DegenerateDirection { epsilon: f32 },

    /// A configuration value was rejected by `SimConfigBuilder::build`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A body handle that does not belong to this simulator.
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),
}

pub type SimResult<T> = Result<T, SimError>;
