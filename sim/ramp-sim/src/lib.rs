//! Tick-driven physics lab: bodies racing down parametric ramps.
//!
//! This crate owns everything that moves. A [`SimulationWorld`] holds the
//! platforms, the installed ramps (spec + mesh + collision proxy), the
//! dynamic bodies and the [`RaceTracker`]. One [`SimulationWorld::tick`]
//! applies an [`InputSnapshot`], integrates every released body, syncs
//! render transforms and runs the finish checks, strictly in that order.
//!
//! Bodies over straight and curved ramps are stepped by the built-in
//! surface-constrained integrator ([`step_on_surface`]). Bodies over wave
//! and spiral ramps belong to an external collision engine seeded with the
//! trimesh proxy; their poses come back through
//! [`SimulationWorld::set_body_state`]. A body is never stepped by both.
//!
//! # Quick Start
//!
//! ```
//! use ramp_sim::{
//!     preset_spec, BodyShape, InputSnapshot, SimulationConfig, SimulationWorld, SpawnPlatform,
//! };
//! use ramp_types::RampKind;
//!
//! let mut world = SimulationWorld::new(SimulationConfig::realtime()).unwrap();
//! world.add_ramp(preset_spec(RampKind::Curved, 0.0)).unwrap();
//!
//! world
//!     .spawn_body(BodyShape::Sphere { radius: 0.5 }, "center", SpawnPlatform::Top)
//!     .unwrap();
//! world.release();
//! world.tick(&InputSnapshot::idle()).unwrap();
//! assert_eq!(world.bodies().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod body;
mod config;
mod error;
mod input;
mod integrator;
mod race;
mod world;

pub use body::{BodyId, BodyShape, DynamicBody};
pub use config::SimulationConfig;
pub use error::{SimError, SimResult};
pub use input::{InputSnapshot, SpawnPlatform, NUDGE_STEP};
pub use integrator::{step_on_surface, AnalyticSurface, ContactState};
pub use race::{FinishLine, RaceRecord, RaceTracker, FINISH_BAND};
pub use world::{
    preset_spec, MotionStrategy, Platform, RampId, RampInstance, SimulationWorld,
};
