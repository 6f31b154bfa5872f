//! Indexed ramp surface mesh.

use nalgebra::{Point3, Vector3};
use ramp_types::{RampError, RampResult};

use crate::bounds::Aabb;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A renderable ramp surface: positions, normals, UVs and triangle indices.
///
/// # Invariants
///
/// - `normals`, `uvs` and `positions` have equal length
/// - `indices.len()` is a multiple of 3
/// - every index references a valid position
///
/// [`SurfaceMesh::validate`] checks all three; the collision proxy builder
/// calls it before handing the buffers to a physics collaborator.
///
/// # Winding Order
///
/// Triangles wind counter-clockwise when viewed from the side their face
/// normal points to.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Per-vertex unit normals (constant within each quad face).
    pub normals: Vec<Vector3<f64>>,
    /// Texture coordinates: U across the strip, V along the progress axis.
    pub uvs: Vec<[f64; 2]>,
    /// Triangle indices, two triangles per quad.
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Create an empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity for `quads` quad segments.
    #[must_use]
    pub fn with_quad_capacity(quads: usize) -> Self {
        Self {
            positions: Vec::with_capacity(quads * 4),
            normals: Vec::with_capacity(quads * 4),
            uvs: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append one quad: four vertices sharing a face normal, two triangles.
    ///
    /// Vertices are taken in strip order (near-left, near-right, far-right,
    /// far-left); triangles are `(0,1,2)` and `(0,2,3)` relative to the quad.
    pub fn push_quad(
        &mut self,
        corners: [Point3<f64>; 4],
        normal: Vector3<f64>,
        uvs: [[f64; 2]; 4],
    ) {
        #[allow(clippy::cast_possible_truncation)] // u32 indices cap vertex count by design
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&corners);
        self.normals.extend(std::iter::repeat(normal).take(4));
        self.uvs.extend_from_slice(&uvs);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append one quad wound for a downward-facing surface.
    ///
    /// Same vertex order as [`SurfaceMesh::push_quad`] but with reversed
    /// triangles, so the face is visible from below.
    pub fn push_quad_reversed(
        &mut self,
        corners: [Point3<f64>; 4],
        normal: Vector3<f64>,
        uvs: [[f64; 2]; 4],
    ) {
        #[allow(clippy::cast_possible_truncation)]
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&corners);
        self.normals.extend(std::iter::repeat(normal).take(4));
        self.uvs.extend_from_slice(&uvs);
        self.indices
            .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    /// Append another mesh, offsetting its indices past this mesh's vertices.
    pub fn merge(&mut self, other: &Self) {
        #[allow(clippy::cast_possible_truncation)]
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Validate the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RampError::AttributeMismatch`] if normals or UVs disagree
    /// with the position count, [`RampError::RaggedIndexBuffer`] if the index
    /// count is not a multiple of 3, and [`RampError::IndexOutOfRange`] for
    /// the first out-of-range index.
    pub fn validate(&self) -> RampResult<()> {
        if self.normals.len() != self.positions.len() {
            return Err(RampError::AttributeMismatch {
                positions: self.positions.len(),
                attribute: "normals",
                attribute_len: self.normals.len(),
            });
        }
        if self.uvs.len() != self.positions.len() {
            return Err(RampError::AttributeMismatch {
                positions: self.positions.len(),
                attribute: "uvs",
                attribute_len: self.uvs.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(RampError::RaggedIndexBuffer(self.indices.len()));
        }
        let vertex_count = self.positions.len();
        for &index in &self.indices {
            if index as usize >= vertex_count {
                return Err(RampError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Axis-aligned bounds of all vertex positions.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn unit_quad() -> SurfaceMesh {
        let mut mesh = SurfaceMesh::new();
        mesh.push_quad(
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            Vector3::y(),
            [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        );
        mesh
    }

    #[test]
    fn push_quad_counts() {
        let mesh = unit_quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.normals.len(), 4);
        assert_eq!(mesh.uvs.len(), 4);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn reversed_quad_flips_winding() {
        let mut mesh = SurfaceMesh::new();
        mesh.push_quad_reversed(
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            -Vector3::y(),
            [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        );
        assert_eq!(&mesh.indices, &[0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn validate_catches_bad_index() {
        let mut mesh = unit_quad();
        mesh.indices[4] = 99;
        assert_eq!(
            mesh.validate(),
            Err(RampError::IndexOutOfRange {
                index: 99,
                vertex_count: 4
            })
        );
    }

    #[test]
    fn validate_catches_attribute_mismatch() {
        let mut mesh = unit_quad();
        mesh.normals.pop();
        assert!(matches!(
            mesh.validate(),
            Err(RampError::AttributeMismatch { .. })
        ));
    }

    #[test]
    fn validate_catches_ragged_indices() {
        let mut mesh = unit_quad();
        mesh.indices.pop();
        assert_eq!(mesh.validate(), Err(RampError::RaggedIndexBuffer(5)));
    }

    #[test]
    fn merge_offsets_indices() {
        let mut mesh = unit_quad();
        let other = unit_quad();
        mesh.merge(&other);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = unit_quad();
        let bounds = mesh.bounds();
        assert!((bounds.min.x - 0.0).abs() < f64::EPSILON);
        assert!((bounds.max.z - 1.0).abs() < f64::EPSILON);
    }
}
