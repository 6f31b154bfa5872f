//! Race tracking: release, finish detection, standings.

use hashbrown::HashMap;
use nalgebra::Point3;
use ramp_types::LaneSet;
use tracing::info;

use crate::body::BodyId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longitudinal tolerance around the finish line's `z`.
pub const FINISH_BAND: f64 = 1.0;

/// The plane bodies race toward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FinishLine {
    /// Longitudinal position of the line.
    pub z: f64,
    /// Lateral half-extent; bodies outside it pass without finishing.
    pub half_width: f64,
}

impl FinishLine {
    /// Whether a position is inside the finish band.
    #[must_use]
    pub fn contains(&self, position: &Point3<f64>) -> bool {
        (position.z - self.z).abs() <= FINISH_BAND && position.x.abs() <= self.half_width
    }
}

/// One completed run. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RaceRecord {
    /// The finishing body.
    pub body: BodyId,
    /// Lane label assigned by nearest lateral distance at the finish.
    pub lane: String,
    /// Release timestamp.
    pub start_time: f64,
    /// Finish timestamp.
    pub finish_time: f64,
    /// `finish_time - start_time`.
    pub elapsed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RaceState {
    Idle,
    Running { start_time: f64 },
    Finished,
}

/// Per-body race state machine.
///
/// `Idle -> Running` on release, `Running -> Finished` on the first tick the
/// body sits inside the finish band. A finished body is skipped by further
/// checks, so at most one record exists per body.
#[derive(Debug, Clone)]
pub struct RaceTracker {
    finish: FinishLine,
    lanes: LaneSet,
    states: HashMap<BodyId, RaceState>,
    records: Vec<RaceRecord>,
}

impl RaceTracker {
    /// Tracker for a finish line and lane set.
    #[must_use]
    pub fn new(finish: FinishLine, lanes: LaneSet) -> Self {
        Self {
            finish,
            lanes,
            states: HashMap::new(),
            records: Vec::new(),
        }
    }

    /// Start tracking a body in the `Idle` state.
    pub fn track(&mut self, body: BodyId) {
        self.states.entry(body).or_insert(RaceState::Idle);
    }

    /// Stop tracking a body; its record, if any, is kept.
    pub fn untrack(&mut self, body: BodyId) {
        self.states.remove(&body);
    }

    /// Release every idle body, stamping `now` as its start time.
    pub fn release(&mut self, now: f64) {
        let mut released = 0_usize;
        for state in self.states.values_mut() {
            if *state == RaceState::Idle {
                *state = RaceState::Running { start_time: now };
                released += 1;
            }
        }
        if released > 0 {
            info!(released, now, "race started");
        }
    }

    /// Finish check for one body at its current position.
    ///
    /// Appends a record the first time a running body enters the finish
    /// band; idempotent afterwards. Returns the new record, if one was made.
    pub fn check_finish(
        &mut self,
        body: BodyId,
        position: &Point3<f64>,
        now: f64,
    ) -> Option<&RaceRecord> {
        let state = self.states.get_mut(&body)?;
        let RaceState::Running { start_time } = *state else {
            return None;
        };
        if !self.finish.contains(position) {
            return None;
        }
        *state = RaceState::Finished;
        let lane = self.lanes.nearest(position.x).label.clone();
        let elapsed = now - start_time;
        info!(%body, lane = %lane, elapsed, "body finished");
        self.records.push(RaceRecord {
            body,
            lane,
            start_time,
            finish_time: now,
            elapsed,
        });
        self.records.last()
    }

    /// Whether a body is currently running.
    #[must_use]
    pub fn is_running(&self, body: BodyId) -> bool {
        matches!(self.states.get(&body), Some(RaceState::Running { .. }))
    }

    /// All records in finish order.
    #[must_use]
    pub fn records(&self) -> &[RaceRecord] {
        &self.records
    }

    /// Records sorted ascending by elapsed time.
    #[must_use]
    pub fn standings(&self) -> Vec<RaceRecord> {
        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| a.elapsed.total_cmp(&b.elapsed));
        ranked
    }

    /// Fastest finisher, if any.
    #[must_use]
    pub fn winner(&self) -> Option<RaceRecord> {
        self.standings().into_iter().next()
    }

    /// Slowest finisher; requires at least two records.
    #[must_use]
    pub fn loser(&self) -> Option<RaceRecord> {
        if self.records.len() < 2 {
            return None;
        }
        self.standings().into_iter().last()
    }

    /// Drop every state and record.
    pub fn reset(&mut self) {
        self.states.clear();
        self.records.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn tracker() -> RaceTracker {
        RaceTracker::new(
            FinishLine {
                z: -7.8,
                half_width: 6.0,
            },
            LaneSet::default(),
        )
    }

    #[test]
    fn idle_bodies_do_not_finish() {
        let mut t = tracker();
        t.track(BodyId(1));
        assert!(t
            .check_finish(BodyId(1), &Point3::new(0.0, 0.0, -7.8), 1.0)
            .is_none());
    }

    #[test]
    fn running_body_finishes_once() {
        let mut t = tracker();
        t.track(BodyId(1));
        t.release(0.5);
        assert!(t.is_running(BodyId(1)));

        let at_line = Point3::new(0.2, -2.0, -7.5);
        assert!(t.check_finish(BodyId(1), &at_line, 3.0).is_some());
        // Second check is a no-op.
        assert!(t.check_finish(BodyId(1), &at_line, 4.0).is_none());
        assert_eq!(t.records().len(), 1);

        let record = &t.records()[0];
        assert!((record.elapsed - 2.5).abs() < 1e-12);
        assert_eq!(record.lane, "center");
    }

    #[test]
    fn finish_requires_the_lateral_bounds() {
        let mut t = tracker();
        t.track(BodyId(1));
        t.release(0.0);
        // Right z, but off to the side of the line.
        assert!(t
            .check_finish(BodyId(1), &Point3::new(9.0, 0.0, -7.8), 1.0)
            .is_none());
    }

    #[test]
    fn lane_is_assigned_by_nearest_offset() {
        let mut t = tracker();
        t.track(BodyId(1));
        t.release(0.0);
        let record = t
            .check_finish(BodyId(1), &Point3::new(-3.4, 0.0, -7.8), 1.0)
            .cloned();
        assert_eq!(record.map(|r| r.lane), Some("left".to_string()));
    }

    #[test]
    fn standings_rank_by_elapsed() {
        let mut t = tracker();
        for id in 1..=3 {
            t.track(BodyId(id));
        }
        t.release(0.0);
        let line = Point3::new(0.0, 0.0, -7.8);
        t.check_finish(BodyId(2), &line, 2.0);
        t.check_finish(BodyId(3), &line, 1.0);
        t.check_finish(BodyId(1), &line, 3.0);

        let standings = t.standings();
        assert_eq!(standings[0].body, BodyId(3));
        assert_eq!(t.winner().map(|r| r.body), Some(BodyId(3)));
        assert_eq!(t.loser().map(|r| r.body), Some(BodyId(1)));
    }

    #[test]
    fn loser_needs_two_records() {
        let mut t = tracker();
        t.track(BodyId(1));
        t.release(0.0);
        t.check_finish(BodyId(1), &Point3::new(0.0, 0.0, -7.8), 1.0);
        assert!(t.winner().is_some());
        assert!(t.loser().is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = tracker();
        t.track(BodyId(1));
        t.release(0.0);
        t.check_finish(BodyId(1), &Point3::new(0.0, 0.0, -7.8), 1.0);
        t.reset();
        assert!(t.records().is_empty());
        assert!(!t.is_running(BodyId(1)));
    }
}
