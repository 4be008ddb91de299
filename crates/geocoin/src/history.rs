//! # Movement History
//!
//! Every location the player has occupied, oldest first. Drawn as a
//! polyline by the map layer.

use geocoin_procedural::GeoPoint;
use serde::{Deserialize, Serialize};

/// Ordered list of visited points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementHistory {
    points: Vec<GeoPoint>,
}

impl MovementHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history from points, oldest first.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Appends a visited point.
    pub fn record(&mut self, point: GeoPoint) {
        self.points.push(point);
    }

    /// Returns every point, oldest first.
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Returns the most recent point.
    #[must_use]
    pub fn last(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    /// Returns the number of recorded points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Forgets every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
