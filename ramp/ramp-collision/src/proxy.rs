//! Proxy construction: spec + mesh in, collidable shape out.

use nalgebra::{Point3, Vector3};
use ramp_mesh::{HeightProfile, SurfaceMesh};
use ramp_types::{RampKind, RampResult, RampSpec};
use tracing::debug;

use crate::shapes::RailSegment;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertical extent of a spiral guard rail.
pub const RAIL_HEIGHT: f64 = 0.4;

/// Lateral extent of a spiral guard rail.
pub const RAIL_THICKNESS: f64 = 0.1;

/// The collidable representation of one ramp.
///
/// Rebuilt whenever the ramp is rebuilt; its lifetime is tied to the ramp
/// instance that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionProxy {
    /// Analytic surface for straight and curved ramps.
    ///
    /// The surface-constrained integrator queries the profile directly;
    /// no triangle data is needed.
    HeightField {
        /// The height function `z -> y` shared with the mesh generator.
        profile: HeightProfile,
        /// Lateral center of the strip.
        center_x: f64,
        /// Half the strip width; bodies beyond it are off the ramp.
        half_width: f64,
    },
    /// Static triangle mesh for wave and spiral ramps.
    ///
    /// The buffers are clones of the rendered mesh, never re-derived, so
    /// the collidable surface cannot diverge from the visible one.
    Trimesh {
        /// Vertex positions, identical to the render buffer.
        positions: Vec<Point3<f64>>,
        /// Triangle indices, identical to the render buffer.
        indices: Vec<u32>,
        /// Guard rails along both edges (spiral only; empty for wave).
        rails: Vec<RailSegment>,
    },
}

impl CollisionProxy {
    /// Whether the proxy is stepped by the analytic integrator.
    #[must_use]
    pub fn is_analytic(&self) -> bool {
        matches!(self, Self::HeightField { .. })
    }
}

/// Build the collision proxy for a ramp.
///
/// The mesh is validated first: a malformed index buffer fails the build
/// rather than handing a corrupt shape to the physics collaborator.
///
/// # Errors
///
/// Returns validation errors from the spec or the mesh, in that order.
pub fn build(spec: &RampSpec, mesh: &SurfaceMesh) -> RampResult<CollisionProxy> {
    spec.validate()?;
    mesh.validate()?;

    let proxy = match spec.kind {
        RampKind::Straight => CollisionProxy::HeightField {
            profile: HeightProfile::linear(spec.start.z, spec.start.y, spec.end.z, spec.end.y),
            center_x: (spec.start.x + spec.end.x) * 0.5,
            half_width: spec.half_width(),
        },
        RampKind::Curved => CollisionProxy::HeightField {
            profile: HeightProfile::tanh(spec.start.z, spec.start.y, spec.end.z, spec.end.y),
            center_x: (spec.start.x + spec.end.x) * 0.5,
            half_width: spec.half_width(),
        },
        RampKind::Wave => CollisionProxy::Trimesh {
            positions: mesh.positions.clone(),
            indices: mesh.indices.clone(),
            rails: Vec::new(),
        },
        RampKind::Spiral => CollisionProxy::Trimesh {
            positions: mesh.positions.clone(),
            indices: mesh.indices.clone(),
            rails: spiral_rails(mesh),
        },
    };

    match &proxy {
        CollisionProxy::HeightField { .. } => {
            debug!(kind = %spec.kind, "built analytic height-field proxy");
        }
        CollisionProxy::Trimesh {
            indices, rails, ..
        } => {
            debug!(
                kind = %spec.kind,
                triangles = indices.len() / 3,
                rails = rails.len(),
                "built trimesh proxy"
            );
        }
    }
    Ok(proxy)
}

/// One rail box per sampled chord per side.
///
/// The spiral strip stores each quad as `[inner1, outer1, outer2, inner2]`,
/// so consecutive edge points come straight from the vertex buffer. Each
/// chord gets a box centered on its midpoint, raised half the rail height,
/// yawed to the chord's horizontal bearing.
fn spiral_rails(mesh: &SurfaceMesh) -> Vec<RailSegment> {
    let quads = mesh.positions.len() / 4;
    let mut rails = Vec::with_capacity(quads * 2);
    for quad in 0..quads {
        let base = quad * 4;
        let inner = (mesh.positions[base], mesh.positions[base + 3]);
        let outer = (mesh.positions[base + 1], mesh.positions[base + 2]);
        for (a, b) in [inner, outer] {
            rails.push(chord_rail(&a, &b));
        }
    }
    rails
}

fn chord_rail(a: &Point3<f64>, b: &Point3<f64>) -> RailSegment {
    let chord = b - a;
    let mut center = nalgebra::center(a, b);
    center.y += RAIL_HEIGHT * 0.5;
    RailSegment {
        center,
        half_extents: Vector3::new(
            RAIL_THICKNESS * 0.5,
            RAIL_HEIGHT * 0.5,
            chord.norm() * 0.5,
        ),
        yaw: chord.x.atan2(chord.z),
    }
}
