//! Procedural ramp surface synthesis.
//!
//! This crate turns a [`RampSpec`](ramp_types::RampSpec) into a renderable
//! [`SurfaceMesh`]: vertex positions, per-vertex normals, UV coordinates and
//! triangle indices. The same buffers double as collision geometry downstream,
//! so generation is strictly deterministic: an identical spec always yields
//! byte-identical buffers.
//!
//! # Ramp families
//!
//! - **Straight**: one planar quad strip between the endpoints
//! - **Curved**: a hyperbolic-tangent descent slab (top + mirrored bottom)
//! - **Wave**: a sinusoidal slab layered on the straight descent
//! - **Spiral**: a helical strip that straightens into the landing platform
//!   over the final 10% of its length
//!
//! # Quick Start
//!
//! ```
//! use ramp_mesh::generate;
//! use ramp_types::RampSpec;
//! use nalgebra::Point3;
//!
//! let spec = RampSpec::straight(
//!     Point3::new(0.0, 2.0, 5.0),
//!     Point3::new(0.0, -4.0, -5.0),
//!     4.0,
//!     0.3,
//!     1,
//! );
//!
//! let mesh = generate(&spec).unwrap();
//! assert_eq!(mesh.positions.len(), 4);
//! assert_eq!(mesh.indices.len(), 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod generate;
mod mesh;
mod profile;

pub use bounds::Aabb;
pub use generate::{generate, SPIRAL_FLATTEN_T, SPIRAL_RUNOUT_OVERSHOOT};
pub use mesh::SurfaceMesh;
pub use profile::{HeightProfile, WAVE_AMPLITUDE, WAVE_FREQUENCY};
