//! Simulation tuning parameters.

use crate::error::{SimError, SimResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed parameters of the world tick and the surface integrator.
///
/// The defaults reproduce the interactive setup: a 60 Hz tick split into
/// 20 substeps, with a narrow contact band around each surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Seconds advanced per tick.
    pub timestep: f64,
    /// Gravity magnitude, pulling along `-Y`.
    pub gravity: f64,
    /// Integrator substeps per tick.
    pub substeps: u32,
    /// Lateral velocity multiplier applied each substep while on a surface.
    pub lateral_damping: f64,
    /// How far above the surface a body still counts as touching.
    pub contact_band_above: f64,
    /// How far below the surface a body still counts as touching.
    pub contact_band_below: f64,
    /// Resting clearance kept between the surface and the body's lowest point.
    pub rest_offset: f64,
}

impl SimulationConfig {
    /// Interactive preset: 60 Hz tick, 20 substeps.
    #[must_use]
    pub fn realtime() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            gravity: 9.8,
            substeps: 20,
            lateral_damping: 0.9,
            contact_band_above: 0.05,
            contact_band_below: 0.1,
            rest_offset: 0.01,
        }
    }

    /// Offline preset: 120 Hz tick, 40 substeps.
    #[must_use]
    pub fn high_fidelity() -> Self {
        Self {
            timestep: 1.0 / 120.0,
            substeps: 40,
            ..Self::realtime()
        }
    }

    /// Duration of one substep.
    #[must_use]
    pub fn substep(&self) -> f64 {
        self.timestep / f64::from(self.substeps)
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidTimestep`] for a non-positive or
    /// non-finite timestep and [`SimError::ZeroSubsteps`] for zero substeps.
    pub fn validate(&self) -> SimResult<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(SimError::InvalidTimestep(self.timestep));
        }
        if self.substeps == 0 {
            return Err(SimError::ZeroSubsteps);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::realtime()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn realtime_defaults() {
        let config = SimulationConfig::default();
        assert_relative_eq!(config.timestep, 1.0 / 60.0);
        assert_relative_eq!(config.gravity, 9.8);
        assert_eq!(config.substeps, 20);
        assert_relative_eq!(config.lateral_damping, 0.9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn substep_divides_the_tick() {
        let config = SimulationConfig::realtime();
        assert_relative_eq!(config.substep() * 20.0, config.timestep);
    }

    #[test]
    fn validate_rejects_degenerate_configs() {
        let mut config = SimulationConfig::realtime();
        config.timestep = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidTimestep(_))
        ));

        let mut config = SimulationConfig::realtime();
        config.substeps = 0;
        assert_eq!(config.validate(), Err(SimError::ZeroSubsteps));
    }
}
