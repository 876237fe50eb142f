//! Rotation-width rules applied by [`MoveSearch`](crate::move_search::MoveSearch).
//!
//! After all columns of one rotation have been tried, the search consults the
//! policy with that rotation's width before moving on to the next rotation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPolicy {
    /// Stop walking the rotation ring after a rotation one column wide.
    pub single_column_stop: bool,
    /// Bias against placements found only in wide rotations. `None` disables it.
    pub wide_rotation: Option<WideRotationPolicy>,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            single_column_stop: true,
            wide_rotation: Some(WideRotationPolicy::default()),
        }
    }
}

impl SearchPolicy {
    /// Policy that examines every rotation and scores all of them alike.
    #[must_use]
    pub fn exhaustive() -> Self {
        Self {
            single_column_stop: false,
            wide_rotation: None,
        }
    }

    /// Whether the ring walk ends after a rotation of `width` columns.
    #[must_use]
    pub fn stops_after(&self, width: usize) -> bool {
        self.single_column_stop && width == 1
    }

    /// Score the running best is raised to after a rotation of `width`
    /// columns, if any.
    #[must_use]
    pub fn score_ceiling_after(&self, width: usize) -> Option<f64> {
        self.wide_rotation
            .filter(|wide| width >= wide.min_width)
            .map(|wide| wide.score_ceiling)
    }
}

/// After a rotation at least `min_width` wide, the running best score becomes
/// `score_ceiling`. The best placement itself is kept, so a later rotation
/// replaces it with any candidate that scores below the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WideRotationPolicy {
    pub min_width: usize,
    pub score_ceiling: f64,
}

impl Default for WideRotationPolicy {
    fn default() -> Self {
        Self {
            min_width: 4,
            score_ceiling: 9_999_999.0,
        }
    }
}
