//! Oriented box primitives handed to the physics collaborator.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use ramp_types::{RampKind, RampSpec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A box with position, half-extents and orientation.
///
/// Matches the static-box shape most collision engines take natively. For a
/// straight ramp the box covers the full strip: centered on the segment
/// midpoint, half-extents `(width/2, thickness/2, |Δz|/2)`, pitched about X
/// to follow the incline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientedBox {
    /// Box center.
    pub center: Point3<f64>,
    /// Half-extents along the box's local axes.
    pub half_extents: Vector3<f64>,
    /// Orientation of the local axes.
    pub rotation: UnitQuaternion<f64>,
}

impl OrientedBox {
    /// Box approximation of a straight ramp's quad strip.
    ///
    /// Returns `None` for any other ramp family; a curved surface has no
    /// adequate single-box approximation.
    #[must_use]
    pub fn from_spec(spec: &RampSpec) -> Option<Self> {
        if spec.kind != RampKind::Straight {
            return None;
        }
        let mid = nalgebra::center(&spec.start, &spec.end);
        let dz = spec.end.z - spec.start.z;
        let slope = if dz.abs() < f64::EPSILON {
            0.0
        } else {
            (spec.end.y - spec.start.y) / dz
        };
        Some(Self {
            center: mid,
            half_extents: Vector3::new(
                spec.half_width(),
                spec.thickness * 0.5,
                dz.abs() * 0.5,
            ),
            rotation: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -slope.atan()),
        })
    }
}

/// One guard-rail chord along a spiral edge.
///
/// An axis-sized box placed on the chord between two consecutive sampled
/// edge points, turned about the vertical axis to follow the chord's
/// horizontal bearing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RailSegment {
    /// Center of the rail box (raised half the rail height off the edge).
    pub center: Point3<f64>,
    /// Half-extents: lateral, vertical, along-chord.
    pub half_extents: Vector3<f64>,
    /// Heading about the vertical axis, radians.
    pub yaw: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_box_matches_strip() {
        let spec = RampSpec::straight(
            Point3::new(0.0, 2.0, 5.0),
            Point3::new(0.0, -4.0, -5.0),
            4.0,
            0.3,
            1,
        );
        let obb = OrientedBox::from_spec(&spec).unwrap();
        assert_relative_eq!(obb.center.x, 0.0);
        assert_relative_eq!(obb.center.y, -1.0);
        assert_relative_eq!(obb.center.z, 0.0);
        assert_relative_eq!(obb.half_extents.x, 2.0);
        assert_relative_eq!(obb.half_extents.y, 0.15);
        assert_relative_eq!(obb.half_extents.z, 5.0);
    }

    #[test]
    fn straight_box_pitch_raises_the_start_side() {
        let spec = RampSpec::straight(
            Point3::new(0.0, 2.0, 5.0),
            Point3::new(0.0, -4.0, -5.0),
            4.0,
            0.3,
            1,
        );
        let obb = OrientedBox::from_spec(&spec).unwrap();
        // The local +z end of the box tilts toward the (higher) start.
        let tip = obb.rotation * Vector3::new(0.0, 0.0, obb.half_extents.z);
        assert!(tip.y > 0.0);
        assert!(tip.z > 0.0);
    }

    #[test]
    fn only_straight_gets_a_box() {
        let spec = RampSpec::curved(
            Point3::new(0.0, 2.0, 5.0),
            Point3::new(0.0, -4.0, -5.0),
            4.0,
            0.3,
            32,
        );
        assert!(OrientedBox::from_spec(&spec).is_none());
    }

    #[test]
    fn flat_straight_box_is_level() {
        let spec = RampSpec::straight(
            Point3::new(0.0, 1.0, 5.0),
            Point3::new(0.0, 1.0, -5.0),
            4.0,
            0.3,
            1,
        );
        let obb = OrientedBox::from_spec(&spec).unwrap();
        assert_relative_eq!(obb.rotation.angle(), 0.0, epsilon = 1e-12);
    }
}
