//! Collision proxies derived from ramp surfaces.
//!
//! The physics collaborator never sees a ramp's render mesh directly; it
//! receives a [`CollisionProxy`] built here. Analytic ramps (straight,
//! curved) hand over their height profile; the rest hand over the *same*
//! vertex and index buffers the renderer draws, cloned rather than
//! re-derived, so the collidable surface can never drift from the visible
//! one. Spirals add guard-rail boxes along both edges.
//!
//! # Quick Start
//!
//! ```
//! use ramp_collision::{build, CollisionProxy};
//! use ramp_mesh::generate;
//! use ramp_types::RampSpec;
//! use nalgebra::Point3;
//!
//! let spec = RampSpec::curved(
//!     Point3::new(0.0, 2.0, 5.0),
//!     Point3::new(0.0, -4.0, -5.0),
//!     4.0,
//!     0.3,
//!     32,
//! );
//! let mesh = generate(&spec).unwrap();
//! let proxy = build(&spec, &mesh).unwrap();
//! assert!(matches!(proxy, CollisionProxy::HeightField { .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod proxy;
mod shapes;

pub use proxy::{build, CollisionProxy, RAIL_HEIGHT, RAIL_THICKNESS};
pub use shapes::{OrientedBox, RailSegment};
