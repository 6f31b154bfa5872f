//! Simulation error taxonomy.

use ramp_types::RampError;
use thiserror::Error;

use crate::body::BodyId;
use crate::world::RampId;

/// Errors surfaced by the simulation layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A ramp failed validation or generation; the world is unchanged.
    #[error("ramp rebuild failed, check parameters: {0}")]
    Ramp(#[from] RampError),

    /// Operation referenced a body that is not in the world.
    #[error("unknown body {0}")]
    UnknownBody(BodyId),

    /// Operation referenced a ramp that is not in the world.
    #[error("unknown ramp {0}")]
    UnknownRamp(RampId),

    /// Spawn referenced a lane label that is not configured.
    #[error("unknown lane {0:?}")]
    UnknownLane(String),

    /// A body state update carried NaN or infinite components.
    #[error("non-finite state for body {0}")]
    NonFiniteState(BodyId),

    /// Body mass must be strictly positive.
    #[error("invalid mass {0} (must be > 0)")]
    InvalidMass(f64),

    /// Body friction must lie in `[0, 1]`.
    #[error("invalid friction {0} (must be in [0, 1])")]
    InvalidFriction(f64),

    /// Config timestep must be strictly positive and finite.
    #[error("invalid timestep {0} (must be > 0 and finite)")]
    InvalidTimestep(f64),

    /// Config must take at least one substep per tick.
    #[error("substep count must be at least 1")]
    ZeroSubsteps,
}

/// Convenience alias for simulation results.
pub type SimResult<T> = Result<T, SimError>;
