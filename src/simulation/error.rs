//! Error type shared by every layer of the spring-network engine
//!
//! Errors fall into four groups:
//! - construction errors (bad mass, mismatched topology, ambiguous hinges)
//! - degenerate geometry (zero-length vectors, collinear hinge arms)
//! - physical invalidity (spring endpoints passed through each other)
//! - persistence failures (file I/O, encoding)
//!
//! None of them are retried or downgraded: they bubble from force evaluation
//! through acceleration and the integrator up to `System::simulate`

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("mass point {index} has non-positive mass {mass}")]
    NonPositiveMass { index: usize, mass: f64 },

    #[error("topology mismatch: {what} has {found} entries, expected {expected}")]
    TopologyMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("connection {index} ({a}, {b}) is invalid for {points} mass points")]
    InvalidConnection {
        index: usize,
        a: usize,
        b: usize,
        points: usize,
    },

    #[error("springs {first} and {second} share {shared} mass points, a hinge needs exactly one")]
    AmbiguousHinge {
        first: usize,
        second: usize,
        shared: usize,
    },

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    #[error("force undefined on spring {spring}: compression {compression} exceeds rest length {rest_length}")]
    ForceUndefined {
        spring: usize,
        compression: f64,
        rest_length: f64,
    },

    #[error("mass point {point} does not participate in {contributor}")]
    NotAParticipant {
        point: usize,
        contributor: &'static str,
    },

    #[error("initial conditions are fixed once stepping has started ({steps} steps done)")]
    AlreadyStarted { steps: usize },

    #[error("invalid time step: t = {t}, dt = {dt}")]
    InvalidTimeStep { t: f64, dt: f64 },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

pub type SimResult<T> = Result<T, SimError>;
