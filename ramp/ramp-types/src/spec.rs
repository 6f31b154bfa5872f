//! Ramp parameter model.
//!
//! A [`RampSpec`] is the single source of truth for one ramp instance.
//! The mesh generator, the collision proxy builder, and the analytic
//! integrator all consume the same spec, which is what keeps the rendered
//! surface and the collidable surface from diverging.

use nalgebra::Point3;

use crate::error::{RampError, RampResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The four parametric ramp families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RampKind {
    /// Planar incline between the two endpoints.
    Straight,
    /// Hyperbolic-tangent descent profile, flattening at both ends.
    Curved,
    /// Sinusoidal height layered on the straight descent.
    Wave,
    /// Helical descent that straightens into the landing platform.
    Spiral,
}

impl RampKind {
    /// Whether this ramp family has an analytic height field `z -> y`.
    ///
    /// Analytic ramps are stepped by the surface-constrained integrator;
    /// the others hand a triangle mesh to the external collision engine.
    #[must_use]
    pub const fn is_analytic(self) -> bool {
        matches!(self, Self::Straight | Self::Curved)
    }
}

impl std::fmt::Display for RampKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Straight => "straight",
            Self::Curved => "curved",
            Self::Wave => "wave",
            Self::Spiral => "spiral",
        };
        f.write_str(name)
    }
}

/// Immutable description of one ramp instance.
///
/// Construct with one of the per-kind builders and check with
/// [`RampSpec::validate`] before generating geometry. A spec that fails
/// validation produces neither a mesh nor a collision proxy.
///
/// # Example
///
/// ```
/// use ramp_types::RampSpec;
/// use nalgebra::Point3;
///
/// let spec = RampSpec::spiral(
///     Point3::new(6.0, 2.0, 0.0),   // start, on the helix
///     Point3::new(0.0, -4.0, -7.8), // end, at the landing platform
///     Point3::new(0.0, 0.0, 0.0),   // helix axis
///     2.5,                          // turns
///     2.0,                          // width
///     0.3,                          // thickness
///     96,                           // segments
/// );
/// assert!(spec.validate().is_ok());
/// assert!((spec.radius() - 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RampSpec {
    /// Which parametric family this ramp belongs to.
    pub kind: RampKind,
    /// Upper endpoint (where bodies enter).
    pub start: Point3<f64>,
    /// Lower endpoint (where bodies exit).
    pub end: Point3<f64>,
    /// Full lateral width of the strip.
    pub width: f64,
    /// Slab thickness (top surface to bottom surface).
    pub thickness: f64,
    /// Number of quad segments along the progress axis.
    pub segments: u32,
    /// Number of helix turns (Spiral only; ignored otherwise).
    pub turns: f64,
    /// Helix axis point (Spiral only; ignored otherwise).
    pub center: Point3<f64>,
}

impl RampSpec {
    /// Create a straight ramp spec.
    #[must_use]
    pub fn straight(
        start: Point3<f64>,
        end: Point3<f64>,
        width: f64,
        thickness: f64,
        segments: u32,
    ) -> Self {
        Self::with_kind(RampKind::Straight, start, end, width, thickness, segments)
    }

    /// Create a curved (tanh-profile) ramp spec.
    #[must_use]
    pub fn curved(
        start: Point3<f64>,
        end: Point3<f64>,
        width: f64,
        thickness: f64,
        segments: u32,
    ) -> Self {
        Self::with_kind(RampKind::Curved, start, end, width, thickness, segments)
    }

    /// Create a wave (sinusoidal) ramp spec.
    #[must_use]
    pub fn wave(
        start: Point3<f64>,
        end: Point3<f64>,
        width: f64,
        thickness: f64,
        segments: u32,
    ) -> Self {
        Self::with_kind(RampKind::Wave, start, end, width, thickness, segments)
    }

    /// Create a spiral ramp spec.
    ///
    /// The helix radius is the horizontal distance from `center` to `start`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn spiral(
        start: Point3<f64>,
        end: Point3<f64>,
        center: Point3<f64>,
        turns: f64,
        width: f64,
        thickness: f64,
        segments: u32,
    ) -> Self {
        Self {
            kind: RampKind::Spiral,
            start,
            end,
            width,
            thickness,
            segments,
            turns,
            center,
        }
    }

    fn with_kind(
        kind: RampKind,
        start: Point3<f64>,
        end: Point3<f64>,
        width: f64,
        thickness: f64,
        segments: u32,
    ) -> Self {
        Self {
            kind,
            start,
            end,
            width,
            thickness,
            segments,
            turns: 0.0,
            center: Point3::origin(),
        }
    }

    /// Helix radius: horizontal distance from the axis to the start point.
    ///
    /// Only meaningful for [`RampKind::Spiral`].
    #[must_use]
    pub fn radius(&self) -> f64 {
        let dx = self.start.x - self.center.x;
        let dz = self.start.z - self.center.z;
        dx.hypot(dz)
    }

    /// Half of the lateral width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Longitudinal extent as `(z_min, z_max)`.
    #[must_use]
    pub fn z_range(&self) -> (f64, f64) {
        (
            self.start.z.min(self.end.z),
            self.start.z.max(self.end.z),
        )
    }

    /// Validate the spec.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `width` or `thickness` is not strictly positive
    /// - `segments` is zero
    /// - any coordinate is NaN or infinite
    /// - (Spiral) `turns` is zero, or the helix radius does not clear the
    ///   strip half-width
    ///
    /// `start.y == end.y` is valid and produces a flat strip.
    pub fn validate(&self) -> RampResult<()> {
        if !(self.width > 0.0) {
            return Err(RampError::NonPositiveWidth(self.width));
        }
        if !(self.thickness > 0.0) {
            return Err(RampError::NonPositiveThickness(self.thickness));
        }
        if self.segments == 0 {
            return Err(RampError::ZeroSegments);
        }
        if !self.start.coords.iter().all(|c| c.is_finite()) {
            return Err(RampError::NonFiniteCoordinate { field: "start" });
        }
        if !self.end.coords.iter().all(|c| c.is_finite()) {
            return Err(RampError::NonFiniteCoordinate { field: "end" });
        }
        if !self.width.is_finite() || !self.thickness.is_finite() {
            return Err(RampError::NonFiniteCoordinate { field: "extents" });
        }

        if self.kind == RampKind::Spiral {
            if !self.center.coords.iter().all(|c| c.is_finite()) {
                return Err(RampError::NonFiniteCoordinate { field: "center" });
            }
            if !self.turns.is_finite() {
                return Err(RampError::NonFiniteCoordinate { field: "turns" });
            }
            if self.turns == 0.0 {
                return Err(RampError::ZeroTurns);
            }
            let radius = self.radius();
            if radius <= self.half_width() {
                return Err(RampError::RadiusTooSmall {
                    radius,
                    width: self.width,
                });
            }
        }

        Ok(())
    }
}
