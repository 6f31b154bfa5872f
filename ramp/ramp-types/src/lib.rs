//! Core parameter types for RampLab.
//!
//! This crate provides the foundational types for describing ramps:
//!
//! - [`RampSpec`] - Immutable description of one ramp instance
//! - [`RampKind`] - The four parametric ramp families
//! - [`Lane`] / [`LaneSet`] - Fixed lateral offsets for placing ramps and bodies
//! - [`RampError`] - Shared error taxonomy for validation and geometry failures
//!
//! # Layer 0 Crate
//!
//! This crate has **zero engine dependencies**. It can be used in:
//! - Headless simulation loops
//! - CLI tools
//! - Rendering front ends
//!
//! # Coordinate System
//!
//! Uses a **right-handed, Y-up coordinate system**:
//! - X: lateral (left/right across the ramp)
//! - Y: height (up/down)
//! - Z: longitudinal (direction of travel)
//!
//! Y-up is chosen so an analytic ramp surface is a height field `z -> y`.
//!
//! # Example
//!
//! ```
//! use ramp_types::{RampKind, RampSpec};
//! use nalgebra::Point3;
//!
//! let spec = RampSpec::straight(
//!     Point3::new(0.0, 2.0, 5.0),
//!     Point3::new(0.0, -4.0, -5.0),
//!     4.0,   // width
//!     0.3,   // thickness
//!     1,     // segments
//! );
//!
//! assert!(spec.validate().is_ok());
//! assert_eq!(spec.kind, RampKind::Straight);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod lane;
mod spec;

pub use error::{RampError, RampResult};
pub use lane::{Lane, LaneSet};
pub use spec::{RampKind, RampSpec};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
