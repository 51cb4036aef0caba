//! Curved polylines for legs that share an origin/destination pair.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::CURVE_EPSILON;

/// How to draw a leg whose origin and destination are the same node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfLoopStyle {
    /// Every sample sits on the node; the adapter draws nothing visible
    #[default]
    Collapse,
    /// A closed circle through the node with diameter `|offset|`
    Loop,
}

/// Ordered `(lat, lon)` samples of one rendered leg
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurvedPath(pub Vec<(f64, f64)>);

impl CurvedPath {
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<(f64, f64)> {
        self.0.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<(f64, f64)> {
        self.0.last().copied()
    }

    /// The middle sample, where a non-degenerate curve bulges the most
    #[must_use]
    pub fn midpoint(&self) -> Option<(f64, f64)> {
        self.0.get(self.0.len() / 2).copied()
    }
}

/// Offset of the `dup_index`-th leg between one node pair.
///
/// The first leg already bends by `base_offset`, so no two legs of a pair
/// share the straight line.
#[must_use]
pub fn leg_offset(base_offset: f64, dup_index: usize) -> f64 {
    // dup indices stay far below 2^53
    #[allow(clippy::cast_precision_loss)]
    let rank = (dup_index + 1) as f64;
    base_offset * rank
}

/// Sample a curve from `(lat1, lon1)` to `(lat2, lon2)` bent sideways by `offset`.
///
/// The straight interpolation between the endpoints is pushed along the
/// left-hand perpendicular of the edge (right-hand for negative offsets)
/// by `offset * sin(t * PI)`, so the bend is zero at both ends and largest
/// at the midpoint. Larger offsets of the same sign always bulge further
/// on the same side.
///
/// Returns exactly `n_points` samples (at least 2), the first and last
/// equal to the inputs. When both endpoints coincide the perpendicular is
/// zero and every sample is the node itself.
///
/// # Examples
/// ```
/// use network_explorer::geometry::curved_line;
///
/// let path = curved_line(19.07, 72.87, 28.61, 77.20, 0.0, 5);
/// assert_eq!(path.len(), 5);
/// assert_eq!(path.first(), Some((19.07, 72.87)));
/// assert_eq!(path.last(), Some((28.61, 77.20)));
/// ```
#[must_use]
pub fn curved_line(lat1: f64, lon1: f64, lat2: f64, lon2: f64, offset: f64, n_points: usize) -> CurvedPath {
    let n_points = n_points.max(2);

    let dx = lon2 - lon1;
    let dy = lat2 - lat1;
    let length = (dx * dx + dy * dy).sqrt() + CURVE_EPSILON;
    let (px, py) = (-dy / length, dx / length);

    #[allow(clippy::cast_precision_loss)]
    let last = (n_points - 1) as f64;

    let mut points: Vec<(f64, f64)> = (0..n_points)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / last;
            let bend = offset * (t * PI).sin();
            (lat1 + dy * t + py * bend, lon1 + dx * t + px * bend)
        })
        .collect();

    // sin(PI) is not exactly zero in floating point
    points[0] = (lat1, lon1);
    points[n_points - 1] = (lat2, lon2);

    CurvedPath(points)
}

/// Sample a closed loop through `(lat, lon)` with diameter `|offset|`.
///
/// The loop leaves the node heading east (west for negative offsets) and
/// returns to it, so loops with growing offsets nest inside each other.
#[must_use]
pub fn self_loop(lat: f64, lon: f64, offset: f64, n_points: usize) -> CurvedPath {
    let n_points = n_points.max(2);
    let radius = offset / 2.0;

    #[allow(clippy::cast_precision_loss)]
    let last = (n_points - 1) as f64;

    let mut points: Vec<(f64, f64)> = (0..n_points)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = 2.0 * PI * (i as f64 / last);
            (lat + radius * (1.0 - angle.cos()), lon + radius * angle.sin())
        })
        .collect();

    points[0] = (lat, lon);
    points[n_points - 1] = (lat, lon);

    CurvedPath(points)
}

/// Curve for one leg, choosing the self-loop shape when both ends coincide
#[must_use]
pub fn leg_curve(
    origin: (f64, f64),
    dest: (f64, f64),
    offset: f64,
    n_points: usize,
    self_loops: SelfLoopStyle,
) -> CurvedPath {
    if origin == dest && self_loops == SelfLoopStyle::Loop {
        return self_loop(origin.0, origin.1, offset, n_points);
    }
    curved_line(origin.0, origin.1, dest.0, dest.1, offset, n_points)
}
