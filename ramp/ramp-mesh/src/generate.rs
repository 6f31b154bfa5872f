//! The four parametric ramp generators.
//!
//! Each generator walks a progress parameter `t` in `[0, 1]` split into
//! `segments` equal intervals and emits quads into a [`SurfaceMesh`].
//! Generation is deterministic: the same spec always produces the same
//! buffers, which lets the collision proxy clone them without re-deriving
//! anything.

use nalgebra::{Point3, Vector3};
use ramp_types::{RampKind, RampResult, RampSpec};
use tracing::debug;

use crate::mesh::SurfaceMesh;
use crate::profile::HeightProfile;

/// Progress fraction at which a spiral stops winding and runs out straight.
pub const SPIRAL_FLATTEN_T: f64 = 0.9;

/// How far the spiral run-out carries past the end point, in height units.
///
/// The run-out dips slightly below the landing so the strip tucks into the
/// platform instead of leaving a visible gap.
pub const SPIRAL_RUNOUT_OVERSHOOT: f64 = 0.25;

/// Generate the surface mesh for a ramp spec.
///
/// # Errors
///
/// Returns the first [`RampError`](ramp_types::RampError) reported by
/// [`RampSpec::validate`]; no partial mesh is produced for an invalid spec.
pub fn generate(spec: &RampSpec) -> RampResult<SurfaceMesh> {
    spec.validate()?;

    let mesh = match spec.kind {
        RampKind::Straight => straight_strip(spec),
        RampKind::Curved | RampKind::Wave => profiled_slab(spec),
        RampKind::Spiral => spiral_strip(spec),
    };

    debug!(
        kind = %spec.kind,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "generated ramp surface"
    );
    Ok(mesh)
}

/// Single planar quad strip between the endpoints.
///
/// The face normal is the true plane normal (perpendicular to the incline,
/// pointing up), not the vertical axis.
fn straight_strip(spec: &RampSpec) -> SurfaceMesh {
    let w = spec.half_width();
    let segments = spec.segments;
    let mut mesh = SurfaceMesh::with_quad_capacity(segments as usize);

    let slope = if (spec.end.z - spec.start.z).abs() < f64::EPSILON {
        0.0
    } else {
        (spec.end.y - spec.start.y) / (spec.end.z - spec.start.z)
    };
    let normal = Vector3::new(0.0, 1.0, -slope).normalize();

    for i in 0..segments {
        let t1 = f64::from(i) / f64::from(segments);
        let t2 = f64::from(i + 1) / f64::from(segments);
        let a = spec.start + (spec.end - spec.start) * t1;
        let b = spec.start + (spec.end - spec.start) * t2;
        mesh.push_quad(
            [
                Point3::new(a.x - w, a.y, a.z),
                Point3::new(a.x + w, a.y, a.z),
                Point3::new(b.x + w, b.y, b.z),
                Point3::new(b.x - w, b.y, b.z),
            ],
            normal,
            [[0.0, t1], [1.0, t1], [1.0, t2], [0.0, t2]],
        );
    }
    mesh
}

/// Double-sided slab following the spec's height profile.
///
/// Used by Curved and Wave: a top strip along the profile plus a mirrored
/// bottom strip offset by `-thickness`, wound to face downward. Normals are
/// vertical per face.
fn profiled_slab(spec: &RampSpec) -> SurfaceMesh {
    let w = spec.half_width();
    let h = spec.thickness;
    let segments = spec.segments;
    // Profile exists for every non-spiral kind.
    let profile =
        HeightProfile::from_spec(spec).unwrap_or(HeightProfile::linear(0.0, 0.0, 1.0, 0.0));
    let mut mesh = SurfaceMesh::with_quad_capacity(segments as usize * 2);

    for i in 0..segments {
        let t1 = f64::from(i) / f64::from(segments);
        let t2 = f64::from(i + 1) / f64::from(segments);
        let x1 = lerp(spec.start.x, spec.end.x, t1);
        let x2 = lerp(spec.start.x, spec.end.x, t2);
        let z1 = lerp(spec.start.z, spec.end.z, t1);
        let z2 = lerp(spec.start.z, spec.end.z, t2);
        let y1 = profile.height(z1);
        let y2 = profile.height(z2);
        let uvs = [[0.0, t1], [1.0, t1], [1.0, t2], [0.0, t2]];

        mesh.push_quad(
            [
                Point3::new(x1 - w, y1, z1),
                Point3::new(x1 + w, y1, z1),
                Point3::new(x2 + w, y2, z2),
                Point3::new(x2 - w, y2, z2),
            ],
            Vector3::y(),
            uvs,
        );
        mesh.push_quad_reversed(
            [
                Point3::new(x1 - w, y1 - h, z1),
                Point3::new(x1 + w, y1 - h, z1),
                Point3::new(x2 + w, y2 - h, z2),
                Point3::new(x2 - w, y2 - h, z2),
            ],
            -Vector3::y(),
            uvs,
        );
    }
    mesh
}

/// One cross-section of the spiral strip: inner and outer edge points.
#[derive(Clone, Copy)]
struct SpiralRing {
    inner: Point3<f64>,
    outer: Point3<f64>,
}

/// Helical strip that straightens into the landing over the final stretch.
///
/// For `t <= SPIRAL_FLATTEN_T` the strip winds around the axis at constant
/// radius with linearly falling height. Past that it interpolates from the
/// boundary ring to a run-out ring just below the end point. The boundary
/// ring is evaluated once from the helix formula and shared by both regimes,
/// so the strip has no seam.
fn spiral_strip(spec: &RampSpec) -> SurfaceMesh {
    let w = spec.half_width();
    let radius = spec.radius();
    let segments = spec.segments;
    let mut mesh = SurfaceMesh::with_quad_capacity(segments as usize);

    let helix_ring = |t: f64| -> SpiralRing {
        let angle = -spec.turns * std::f64::consts::TAU * t;
        let y = lerp(spec.start.y, spec.end.y, t);
        let radial = Vector3::new(angle.cos(), 0.0, angle.sin());
        let axis = Point3::new(spec.center.x, y, spec.center.z);
        SpiralRing {
            inner: axis + radial * (radius - w),
            outer: axis + radial * (radius + w),
        }
    };

    let boundary = helix_ring(SPIRAL_FLATTEN_T);
    let boundary_angle = -spec.turns * std::f64::consts::TAU * SPIRAL_FLATTEN_T;
    let radial = Vector3::new(boundary_angle.cos(), 0.0, boundary_angle.sin());
    let boundary_center = nalgebra::center(&boundary.inner, &boundary.outer);
    let runout_center = Point3::new(
        spec.end.x,
        spec.end.y - SPIRAL_RUNOUT_OVERSHOOT,
        spec.end.z,
    );

    // Lateral direction of the run-out: horizontal, perpendicular to the
    // travel direction, on the same side as the helix radial so the strip
    // does not twist at the hand-over.
    let travel = Vector3::new(
        runout_center.x - boundary_center.x,
        0.0,
        runout_center.z - boundary_center.z,
    );
    let lateral = if travel.norm() < f64::EPSILON {
        radial
    } else {
        let perp = Vector3::new(-travel.z, 0.0, travel.x).normalize();
        if perp.dot(&radial) >= 0.0 {
            perp
        } else {
            -perp
        }
    };
    let runout = SpiralRing {
        inner: runout_center - lateral * w,
        outer: runout_center + lateral * w,
    };

    let ring_at = |t: f64| -> SpiralRing {
        if t <= SPIRAL_FLATTEN_T {
            helix_ring(t)
        } else {
            let tf = (t - SPIRAL_FLATTEN_T) / (1.0 - SPIRAL_FLATTEN_T);
            SpiralRing {
                inner: boundary.inner + (runout.inner - boundary.inner) * tf,
                outer: boundary.outer + (runout.outer - boundary.outer) * tf,
            }
        }
    };

    for i in 0..segments {
        let t1 = f64::from(i) / f64::from(segments);
        let t2 = f64::from(i + 1) / f64::from(segments);
        let r1 = ring_at(t1);
        let r2 = ring_at(t2);
        mesh.push_quad(
            [r1.inner, r1.outer, r2.outer, r2.inner],
            Vector3::y(),
            [[0.0, t1], [1.0, t1], [1.0, t2], [0.0, t2]],
        );
    }
    mesh
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
