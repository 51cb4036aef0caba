use serde::Serialize;

use super::leg::ConnectionLeg;
use crate::geometry::CurvedPath;

/// A leg with resolved coordinates, its rank among parallel legs and its curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredLeg {
    #[serde(flatten)]
    pub leg: ConnectionLeg,
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub dest_lat: f64,
    pub dest_lon: f64,
    /// Rank among legs with the same (origin, dest), in filter order
    pub dup_index: usize,
    pub curve: CurvedPath,
}

impl FilteredLeg {
    #[must_use]
    pub const fn origin_position(&self) -> (f64, f64) {
        (self.origin_lat, self.origin_lon)
    }

    #[must_use]
    pub const fn dest_position(&self) -> (f64, f64) {
        (self.dest_lat, self.dest_lon)
    }

    /// Stroke color for the map, grey for unrecognized SLA values
    #[must_use]
    pub fn map_color(&self) -> &'static str {
        self.leg.sla_color().map_or("gray", |c| c.map_color())
    }

    /// Hover text shown for the leg on the map
    #[must_use]
    pub fn tooltip(&self) -> String {
        format!(
            "{} → {}\nDeparture: {}\nBuffer: {} min\nSLA: {}",
            self.leg.origin, self.leg.dest, self.leg.departure, self.leg.buffer_minutes, self.leg.sla
        )
    }
}
