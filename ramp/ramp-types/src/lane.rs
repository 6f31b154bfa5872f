//! Lanes: fixed lateral offsets for placing ramps and bodies.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One lane: a labelled lateral offset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lane {
    /// Human-readable label ("left", "center", ...).
    pub label: String,
    /// Lateral (X) offset of the lane centerline.
    pub offset: f64,
}

impl Lane {
    /// Create a lane.
    #[must_use]
    pub fn new(label: impl Into<String>, offset: f64) -> Self {
        Self {
            label: label.into(),
            offset,
        }
    }
}

/// A fixed set of lanes, used for ramp placement and race grouping.
///
/// # Example
///
/// ```
/// use ramp_types::LaneSet;
///
/// let lanes = LaneSet::default();
/// assert_eq!(lanes.len(), 3);
/// assert_eq!(lanes.nearest(-3.2).label, "left");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneSet {
    lanes: Vec<Lane>,
}

impl Default for LaneSet {
    /// Three lanes at -4, 0 and +4, matching the lab's platform layout.
    fn default() -> Self {
        Self {
            lanes: vec![
                Lane::new("left", -4.0),
                Lane::new("center", 0.0),
                Lane::new("right", 4.0),
            ],
        }
    }
}

impl LaneSet {
    /// Create a lane set from explicit lanes.
    ///
    /// An empty set is allowed but [`LaneSet::nearest`] will panic on it;
    /// callers that build custom sets are expected to provide at least one
    /// lane, as [`LaneSet::default`] does.
    #[must_use]
    pub fn new(lanes: Vec<Lane>) -> Self {
        Self { lanes }
    }

    /// Number of lanes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Whether the set has no lanes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Iterate over the lanes.
    pub fn iter(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter()
    }

    /// Look up a lane by label.
    #[must_use]
    pub fn by_label(&self, label: &str) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.label == label)
    }

    /// The lane whose centerline is nearest to lateral position `x`.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty.
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // documented above
    pub fn nearest(&self, x: f64) -> &Lane {
        assert!(!self.lanes.is_empty(), "LaneSet::nearest on empty set");
        let mut best = &self.lanes[0];
        let mut best_dist = (x - best.offset).abs();
        for lane in &self.lanes[1..] {
            let dist = (x - lane.offset).abs();
            if dist < best_dist {
                best = lane;
                best_dist = dist;
            }
        }
        best
    }
}
