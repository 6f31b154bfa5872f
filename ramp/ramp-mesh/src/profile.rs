//! Height profiles: analytic `z -> y` descriptions of ramp surfaces.
//!
//! A profile is the single source of truth for where a ramp surface sits
//! at a given longitudinal coordinate. The mesh generator samples the
//! same profile the integrator later queries, so a body can never see
//! geometry the solver does not also see.

use ramp_types::{RampKind, RampSpec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Peak-to-midline amplitude of the wave surface.
pub const WAVE_AMPLITUDE: f64 = 0.5;

/// Angular frequency of the wave surface, in radians per unit `z`.
pub const WAVE_FREQUENCY: f64 = 0.5;

/// An analytic height function over a longitudinal span.
///
/// All variants report height and slope as functions of `z` alone; lateral
/// position never changes the surface height.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeightProfile {
    /// Flat incline interpolating linearly between two endpoint heights.
    Linear {
        /// Start of the span in `z`.
        z_start: f64,
        /// End of the span in `z`.
        z_end: f64,
        /// Height at `z_start`.
        y_start: f64,
        /// Height at `z_end`.
        y_end: f64,
    },
    /// Smooth S-curve through both endpoints, centered on the midpoint.
    Tanh {
        /// Midpoint of the span in `z`.
        z_mid: f64,
        /// Height midway between the endpoints.
        y_mid: f64,
        /// Vertical scale; zero when the endpoints share a height.
        scale: f64,
        /// Sorted span the profile is defined over.
        z_range: (f64, f64),
    },
    /// Linear incline with a sinusoidal ripple superimposed.
    Wave {
        /// Start of the span in `z`.
        z_start: f64,
        /// End of the span in `z`.
        z_end: f64,
        /// Height at `z_start`, before the ripple.
        y_start: f64,
        /// Height at `z_end`, before the ripple.
        y_end: f64,
    },
}

impl HeightProfile {
    /// Linear profile between two endpoints.
    #[must_use]
    pub fn linear(z_start: f64, y_start: f64, z_end: f64, y_end: f64) -> Self {
        Self::Linear {
            z_start,
            z_end,
            y_start,
            y_end,
        }
    }

    /// S-curve profile that passes exactly through both endpoints.
    ///
    /// The curve is odd-symmetric about the span midpoint, so one scale
    /// factor fits both ends. A flat or zero-span input degenerates to a
    /// constant height.
    #[must_use]
    pub fn tanh(z_start: f64, y_start: f64, z_end: f64, y_end: f64) -> Self {
        let z_mid = (z_start + z_end) * 0.5;
        let y_mid = (y_start + y_end) * 0.5;
        let arg = (z_start - z_mid) * 0.5;
        let denom = arg.tanh();
        let scale = if denom.abs() < f64::EPSILON {
            0.0
        } else {
            (y_start - y_mid) / denom
        };
        let z_range = if z_start <= z_end {
            (z_start, z_end)
        } else {
            (z_end, z_start)
        };
        Self::Tanh {
            z_mid,
            y_mid,
            scale,
            z_range,
        }
    }

    /// Rippled incline between two endpoints.
    #[must_use]
    pub fn wave(z_start: f64, y_start: f64, z_end: f64, y_end: f64) -> Self {
        Self::Wave {
            z_start,
            z_end,
            y_start,
            y_end,
        }
    }

    /// Profile for a ramp spec, if the family is height-field shaped.
    ///
    /// Spirals wind around a vertical axis and have no single-valued
    /// `z -> y` description, so they return `None`.
    #[must_use]
    pub fn from_spec(spec: &RampSpec) -> Option<Self> {
        let (s, e) = (spec.start, spec.end);
        match spec.kind {
            RampKind::Straight => Some(Self::linear(s.z, s.y, e.z, e.y)),
            RampKind::Curved => Some(Self::tanh(s.z, s.y, e.z, e.y)),
            RampKind::Wave => Some(Self::wave(s.z, s.y, e.z, e.y)),
            RampKind::Spiral => None,
        }
    }

    /// Surface height at `z`.
    #[must_use]
    pub fn height(&self, z: f64) -> f64 {
        match *self {
            Self::Linear {
                z_start,
                z_end,
                y_start,
                y_end,
            } => lerp_height(z, z_start, z_end, y_start, y_end),
            Self::Tanh {
                z_mid,
                y_mid,
                scale,
                ..
            } => y_mid + scale * ((z - z_mid) * 0.5).tanh(),
            Self::Wave {
                z_start,
                z_end,
                y_start,
                y_end,
            } => {
                let z_mid = (z_start + z_end) * 0.5;
                lerp_height(z, z_start, z_end, y_start, y_end)
                    + WAVE_AMPLITUDE * (WAVE_FREQUENCY * (z - z_mid)).sin()
            }
        }
    }

    /// Surface slope `dy/dz` at `z`.
    #[must_use]
    pub fn slope(&self, z: f64) -> f64 {
        match *self {
            Self::Linear {
                z_start,
                z_end,
                y_start,
                y_end,
            } => lerp_slope(z_start, z_end, y_start, y_end),
            Self::Tanh { z_mid, scale, .. } => {
                let sech = 1.0 / ((z - z_mid) * 0.5).cosh();
                scale * 0.5 * sech * sech
            }
            Self::Wave {
                z_start,
                z_end,
                y_start,
                y_end,
            } => {
                let z_mid = (z_start + z_end) * 0.5;
                lerp_slope(z_start, z_end, y_start, y_end)
                    + WAVE_AMPLITUDE * WAVE_FREQUENCY * (WAVE_FREQUENCY * (z - z_mid)).cos()
            }
        }
    }

    /// Sorted `(min, max)` span the profile covers.
    #[must_use]
    pub fn z_range(&self) -> (f64, f64) {
        match *self {
            Self::Linear {
                z_start, z_end, ..
            }
            | Self::Wave {
                z_start, z_end, ..
            } => {
                if z_start <= z_end {
                    (z_start, z_end)
                } else {
                    (z_end, z_start)
                }
            }
            Self::Tanh { z_range, .. } => z_range,
        }
    }

    /// Whether `z` falls within the profile's span.
    #[must_use]
    pub fn contains_z(&self, z: f64) -> bool {
        let (lo, hi) = self.z_range();
        z >= lo && z <= hi
    }
}

fn lerp_height(z: f64, z_start: f64, z_end: f64, y_start: f64, y_end: f64) -> f64 {
    let span = z_end - z_start;
    if span.abs() < f64::EPSILON {
        return (y_start + y_end) * 0.5;
    }
    let t = (z - z_start) / span;
    y_start + t * (y_end - y_start)
}

fn lerp_slope(z_start: f64, z_end: f64, y_start: f64, y_end: f64) -> f64 {
    let span = z_end - z_start;
    if span.abs() < f64::EPSILON {
        return 0.0;
    }
    (y_end - y_start) / span
}
