//! Dynamic bodies and their shapes.

use nalgebra::{Point3, Vector3};

use crate::error::{SimError, SimResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for a body within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Collision shape of a dynamic body.
///
/// Only the lowest point matters to the surface-constrained integrator;
/// the full shape is forwarded to the external collision engine for the
/// trimesh ramp families.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyShape {
    /// Ball of the given radius.
    Sphere {
        /// Radius.
        radius: f64,
    },
    /// Axis-aligned cube.
    Cube {
        /// Half the edge length.
        half_extent: f64,
    },
    /// Upright cylinder.
    Cylinder {
        /// Cap radius.
        radius: f64,
        /// Half the height.
        half_height: f64,
    },
    /// Square pyramid resting on its base.
    Pyramid {
        /// Half the base edge.
        half_base: f64,
        /// Half the height.
        half_height: f64,
    },
}

impl BodyShape {
    /// Distance from the body center to its lowest point.
    #[must_use]
    pub fn lower_offset(&self) -> f64 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Cube { half_extent } => half_extent,
            Self::Cylinder { half_height, .. } | Self::Pyramid { half_height, .. } => half_height,
        }
    }
}

impl Default for BodyShape {
    fn default() -> Self {
        Self::Sphere { radius: 0.5 }
    }
}

/// A body stepped by the world tick.
///
/// Fields are mutated only through [`SimulationWorld`](crate::SimulationWorld);
/// the integrator receives bodies by exclusive borrow from the tick loop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DynamicBody {
    /// World-unique identifier.
    pub id: BodyId,
    /// Collision shape.
    pub shape: BodyShape,
    /// Center position.
    pub position: Point3<f64>,
    /// Linear velocity.
    pub velocity: Vector3<f64>,
    /// Mass, strictly positive.
    pub mass: f64,
    /// Surface friction coefficient in `[0, 1]`.
    pub friction: f64,
    /// Lane label chosen at spawn, if any.
    pub lane: Option<String>,
    /// Whether the body has been released into the race.
    pub released: bool,
}

impl DynamicBody {
    /// Create a held body at rest.
    #[must_use]
    pub fn new(id: BodyId, shape: BodyShape, position: Point3<f64>) -> Self {
        Self {
            id,
            shape,
            position,
            velocity: Vector3::zeros(),
            mass: 1.0,
            friction: 0.3,
            lane: None,
            released: false,
        }
    }

    /// Set the mass.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidMass`] unless `mass` is finite and
    /// strictly positive.
    pub fn with_mass(mut self, mass: f64) -> SimResult<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimError::InvalidMass(mass));
        }
        self.mass = mass;
        Ok(self)
    }

    /// Set the friction coefficient.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidFriction`] unless `friction` is in `[0, 1]`.
    pub fn with_friction(mut self, friction: f64) -> SimResult<Self> {
        if !friction.is_finite() || !(0.0..=1.0).contains(&friction) {
            return Err(SimError::InvalidFriction(friction));
        }
        self.friction = friction;
        Ok(self)
    }

    /// Height of the body's lowest point.
    #[must_use]
    pub fn lower_extent(&self) -> f64 {
        self.position.y - self.shape.lower_offset()
    }

    /// Divergence check: every component finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
            && self.velocity.iter().all(|c| c.is_finite())
    }
}
