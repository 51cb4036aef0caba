//! Coordinate join between filtered legs and the node table.

use serde::Serialize;

use crate::models::{ConnectionLeg, NodeTable};
use crate::time::DepartureTime;

/// A leg with both endpoints resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLeg<'a> {
    pub leg: &'a ConnectionLeg,
    pub origin: (f64, f64),
    pub dest: (f64, f64),
}

/// A leg left out of the join and the codes that failed to resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedLeg {
    pub connection_full_path: String,
    pub origin: String,
    pub dest: String,
    pub departure: DepartureTime,
    pub unresolved: Vec<String>,
}

/// Legs excluded by the join
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DroppedLegs {
    pub legs: Vec<DroppedLeg>,
}

impl DroppedLegs {
    #[must_use]
    pub fn count(&self) -> usize {
        self.legs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Distinct unresolved codes, sorted
    #[must_use]
    pub fn unresolved_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .legs
            .iter()
            .flat_map(|d| d.unresolved.iter().map(String::as_str))
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}

/// Attach coordinates to each leg, keeping only legs whose origin and
/// destination both resolve. Order is preserved; every excluded leg is
/// reported in the returned `DroppedLegs`.
#[must_use]
pub fn join_coordinates<'a>(legs: &[&'a ConnectionLeg], nodes: &NodeTable) -> (Vec<ResolvedLeg<'a>>, DroppedLegs) {
    let mut resolved = Vec::with_capacity(legs.len());
    let mut dropped = DroppedLegs::default();

    for &leg in legs {
        match (nodes.resolve(&leg.origin), nodes.resolve(&leg.dest)) {
            (Ok(origin), Ok(dest)) => resolved.push(ResolvedLeg { leg, origin, dest }),
            (origin, dest) => {
                let unresolved = [origin.err(), dest.err()]
                    .into_iter()
                    .flatten()
                    .map(|e| e.code)
                    .collect();
                dropped.legs.push(DroppedLeg {
                    connection_full_path: leg.connection_full_path.clone(),
                    origin: leg.origin.clone(),
                    dest: leg.dest.clone(),
                    departure: leg.departure,
                    unresolved,
                });
            }
        }
    }

    if !dropped.is_empty() {
        tracing::warn!(
            dropped = dropped.count(),
            codes = ?dropped.unresolved_codes(),
            "legs dropped because their node codes are missing from the node table"
        );
    }

    (resolved, dropped)
}
