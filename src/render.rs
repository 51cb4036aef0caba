//! One filter-and-render pass: everything the map adapter needs for a selection.

use indexmap::IndexMap;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::filter::{dup_indices, filter_legs, join_coordinates, DroppedLegs, FilterParams, SlaMetrics};
use crate::geometry::{leg_curve, leg_offset};
use crate::log;
use crate::models::{ExplorerSettings, FilteredLeg, MapSettings, Node};

/// Output of a render pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderOutput {
    /// Legs to draw, in filter order
    pub legs: Vec<FilteredLeg>,
    /// Metrics over every leg that passed the filters, including ones the join dropped
    pub metrics: SlaMetrics,
    pub dropped: DroppedLegs,
    /// Nodes touched by `legs`, in first-seen order
    pub markers: Vec<Node>,
    /// Initial map center and zoom
    pub view: MapSettings,
}

impl RenderOutput {
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.dropped.count()
    }
}

/// Filter the snapshot, compute metrics, join coordinates, rank parallel
/// legs and curve them.
///
/// Pure in `dataset`, `params` and `settings`: the same inputs always give
/// the same output.
#[must_use]
pub fn render(dataset: &Dataset, params: &FilterParams, settings: &ExplorerSettings) -> RenderOutput {
    let filtered = filter_legs(dataset.legs(), params);
    let metrics = SlaMetrics::compute(filtered.iter().copied(), &settings.risk);

    let (resolved, dropped) = join_coordinates(&filtered, dataset.nodes());
    let ranks = dup_indices(resolved.iter().map(|r| r.leg.pair()));

    let curve = &settings.curve;
    let legs: Vec<FilteredLeg> = resolved
        .iter()
        .zip(ranks)
        .map(|(resolved, dup_index)| FilteredLeg {
            leg: resolved.leg.clone(),
            origin_lat: resolved.origin.0,
            origin_lon: resolved.origin.1,
            dest_lat: resolved.dest.0,
            dest_lon: resolved.dest.1,
            dup_index,
            curve: leg_curve(
                resolved.origin,
                resolved.dest,
                leg_offset(curve.base_offset, dup_index),
                curve.points,
                curve.self_loops,
            ),
        })
        .collect();

    let markers = markers(&legs);

    log!(
        "Render pass: {} filtered, {} drawn, {} dropped, risk {}",
        metrics.total,
        legs.len(),
        dropped.count(),
        metrics.format_risk_score()
    );

    RenderOutput {
        legs,
        metrics,
        dropped,
        markers,
        view: settings.map,
    }
}

fn markers(legs: &[FilteredLeg]) -> Vec<Node> {
    let mut seen: IndexMap<&str, (f64, f64)> = IndexMap::new();
    for leg in legs {
        seen.entry(leg.leg.origin.as_str()).or_insert(leg.origin_position());
        seen.entry(leg.leg.dest.as_str()).or_insert(leg.dest_position());
    }
    seen.into_iter()
        .map(|(code, (lat, lon))| Node::new(code, lat, lon))
        .collect()
}
