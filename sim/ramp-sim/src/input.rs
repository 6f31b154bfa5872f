//! Per-tick input snapshot.

use ramp_types::RampKind;

use crate::body::BodyShape;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance a held body moves per nudged tick.
pub const NUDGE_STEP: f64 = 0.1;

/// Which platform a body spawns on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpawnPlatform {
    /// The upper platform (race start).
    #[default]
    Top,
    /// The lower platform (race finish).
    Bottom,
}

/// Everything the world reads from the user in one tick.
///
/// Sampled once at tick start and passed by value; the tick never reads
/// input mid-integration, so a tick is a pure function of (world, snapshot).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputSnapshot {
    /// Spawn a body this tick.
    pub spawn: bool,
    /// Add a ramp this tick.
    pub add_ramp: bool,
    /// Release all held bodies and start the race.
    pub release: bool,
    /// Clear bodies and race records.
    pub reset: bool,
    /// Nudge the held body toward `-z`.
    pub nudge_forward: bool,
    /// Nudge the held body toward `+z`.
    pub nudge_back: bool,
    /// Nudge the held body toward `-x`.
    pub nudge_left: bool,
    /// Nudge the held body toward `+x`.
    pub nudge_right: bool,
    /// Ramp family used when `add_ramp` is set.
    pub ramp_kind: RampKind,
    /// Lane label used for spawns and ramp placement.
    pub lane: String,
    /// Shape used when `spawn` is set.
    pub shape: BodyShape,
    /// Platform used when `spawn` is set.
    pub spawn_platform: SpawnPlatform,
}

impl InputSnapshot {
    /// A snapshot with no actions: the world just integrates.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            spawn: false,
            add_ramp: false,
            release: false,
            reset: false,
            nudge_forward: false,
            nudge_back: false,
            nudge_left: false,
            nudge_right: false,
            ramp_kind: RampKind::Straight,
            lane: "center".to_string(),
            shape: BodyShape::default(),
            spawn_platform: SpawnPlatform::Top,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn idle_snapshot_does_nothing() {
        let input = InputSnapshot::idle();
        assert!(!input.spawn && !input.add_ramp && !input.release && !input.reset);
        assert_eq!(input.lane, "center");
        assert_eq!(input.spawn_platform, SpawnPlatform::Top);
    }
}
