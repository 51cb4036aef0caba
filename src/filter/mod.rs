//! Filter pipeline over the legs table.
//!
//! A pass runs the stages in a fixed order:
//!
//! 1. Connection path
//! 2. Origin codes
//! 3. Departure time window
//! 4. SLA colors and modes
//!
//! Each stage keeps the relative order of the legs it is given, so the
//! same parameters over the same snapshot always yield the same sequence.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub mod dup_index;
pub mod join;
pub mod metrics;
pub mod time_window;

pub use dup_index::dup_indices;
pub use join::{join_coordinates, DroppedLeg, DroppedLegs, ResolvedLeg};
pub use metrics::SlaMetrics;
pub use time_window::{TimeWindow, TimeWindowError};

use crate::dataset::Dataset;
use crate::models::{ConnectionLeg, Mode, SlaSet};

/// Selections for one filter pass; `None` leaves a stage out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub path: Option<String>,
    pub origins: Option<BTreeSet<String>>,
    pub time_window: TimeWindow,
    /// An explicit selection never matches unrecognized SLA values
    pub sla: Option<SlaSet>,
    pub modes: Option<BTreeSet<Mode>>,
}

impl FilterParams {
    /// The initial selection for a path: its full departure range, every
    /// SLA color and every mode
    #[must_use]
    pub fn for_path(dataset: &Dataset, path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            origins: None,
            time_window: TimeWindow::full_range(&dataset.departure_times(path)),
            sla: Some(SlaSet::ALL),
            modes: None,
        }
    }

    #[must_use]
    pub fn with_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.origins = Some(origins.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = window;
        self
    }

    #[must_use]
    pub fn with_sla(mut self, sla: SlaSet) -> Self {
        self.sla = Some(sla);
        self
    }

    #[must_use]
    pub fn with_modes<I, M>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Mode>,
    {
        self.modes = Some(modes.into_iter().map(Into::into).collect());
        self
    }

    /// Check the parts that deserialization cannot
    ///
    /// # Errors
    ///
    /// Returns an error if the time window is malformed.
    pub fn validate(&self) -> Result<(), TimeWindowError> {
        self.time_window.validate()
    }
}

/// Keep legs on the selected connection path
#[must_use]
pub fn by_path<'a>(mut legs: Vec<&'a ConnectionLeg>, path: Option<&str>) -> Vec<&'a ConnectionLeg> {
    if let Some(path) = path {
        legs.retain(|leg| leg.connection_full_path == path);
    }
    legs
}

/// Keep legs starting at one of the selected origins
#[must_use]
pub fn by_origins<'a>(mut legs: Vec<&'a ConnectionLeg>, origins: Option<&BTreeSet<String>>) -> Vec<&'a ConnectionLeg> {
    if let Some(origins) = origins {
        legs.retain(|leg| origins.contains(&leg.origin));
    }
    legs
}

/// Keep legs departing inside the window
#[must_use]
pub fn by_time_window<'a>(mut legs: Vec<&'a ConnectionLeg>, window: &TimeWindow) -> Vec<&'a ConnectionLeg> {
    if *window != TimeWindow::All {
        legs.retain(|leg| window.contains(leg.departure));
    }
    legs
}

/// Keep legs whose SLA color and mode are both selected
#[must_use]
pub fn by_sla_and_mode<'a>(
    mut legs: Vec<&'a ConnectionLeg>,
    sla: Option<SlaSet>,
    modes: Option<&BTreeSet<Mode>>,
) -> Vec<&'a ConnectionLeg> {
    legs.retain(|leg| {
        sla.is_none_or(|set| set.matches(&leg.sla)) && modes.is_none_or(|modes| modes.contains(&leg.mode))
    });
    legs
}

/// Run every stage over `legs`, borrowing the survivors in input order
#[must_use]
pub fn filter_legs<'a>(legs: &'a [ConnectionLeg], params: &FilterParams) -> Vec<&'a ConnectionLeg> {
    let selected = legs.iter().collect();
    let selected = by_path(selected, params.path.as_deref());
    let selected = by_origins(selected, params.origins.as_ref());
    let selected = by_time_window(selected, &params.time_window);
    by_sla_and_mode(selected, params.sla, params.modes.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leg::test_support::leg;
    use crate::models::{NodeTable, SlaColor};

    fn scenario() -> Vec<ConnectionLeg> {
        vec![
            leg("P", "A", "B", "08:00", "AIR", "GREEN"),
            leg("P", "A", "B", "09:00", "AIR", "RED"),
            leg("P", "B", "C", "08:30", "AIR", "ORANGE"),
        ]
    }

    fn t(s: &str) -> crate::time::DepartureTime {
        s.parse().expect("valid time")
    }

    #[test]
    fn test_sla_and_time_window_scenario() {
        let legs = scenario();
        let params = FilterParams::default()
            .with_sla(SlaSet::RED | SlaSet::GREEN)
            .with_time_window(TimeWindow::range(t("08:00"), t("08:30")).expect("valid range"));

        let filtered = filter_legs(&legs, &params);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].pair(), ("A", "B"));
        assert_eq!(filtered[0].departure, t("08:00"));
        assert_eq!(filtered[0].sla_color(), Some(SlaColor::Green));
    }

    #[test]
    fn test_default_params_keep_everything() {
        let legs = scenario();
        assert_eq!(filter_legs(&legs, &FilterParams::default()).len(), 3);
    }

    #[test]
    fn test_path_selection() {
        let legs = vec![
            leg("P1", "A", "B", "08:00", "AIR", "GREEN"),
            leg("P2", "A", "B", "08:00", "AIR", "GREEN"),
            leg("P1", "B", "C", "09:00", "AIR", "GREEN"),
        ];
        let params = FilterParams {
            path: Some("P1".to_string()),
            ..FilterParams::default()
        };
        let filtered = filter_legs(&legs, &params);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|leg| leg.connection_full_path == "P1"));
    }

    #[test]
    fn test_origin_filter() {
        let legs = scenario();
        let params = FilterParams::default().with_origins(["B"]);
        let filtered = filter_legs(&legs, &params);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].origin, "B");
    }

    #[test]
    fn test_mode_filter() {
        let legs = vec![
            leg("P", "A", "B", "08:00", "AIR", "GREEN"),
            leg("P", "A", "B", "08:00", "SURFACE", "GREEN"),
        ];
        let params = FilterParams::default().with_modes(["SURFACE"]);
        let filtered = filter_legs(&legs, &params);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].mode.as_str(), "SURFACE");
    }

    #[test]
    fn test_overnight_window_filter() {
        let legs = vec![
            leg("P", "A", "B", "23:15", "AIR", "GREEN"),
            leg("P", "A", "B", "10:00", "AIR", "GREEN"),
            leg("P", "A", "B", "02:40", "AIR", "GREEN"),
        ];
        let params = FilterParams::default().with_time_window(TimeWindow::hour_of_day(18, 6).expect("valid hours"));
        let departures: Vec<String> = filter_legs(&legs, &params).iter().map(|l| l.departure.to_string()).collect();
        assert_eq!(departures, vec!["23:15", "02:40"]);
    }

    #[test]
    fn test_unrecognized_sla_only_without_selection() {
        let legs = vec![leg("P", "A", "B", "08:00", "AIR", "AMBER")];
        assert_eq!(filter_legs(&legs, &FilterParams::default()).len(), 1);
        assert!(filter_legs(&legs, &FilterParams::default().with_sla(SlaSet::ALL)).is_empty());
    }

    #[test]
    fn test_empty_selections_yield_nothing() {
        let legs = scenario();
        assert!(filter_legs(&legs, &FilterParams::default().with_sla(SlaSet::empty())).is_empty());
        assert!(filter_legs(&legs, &FilterParams::default().with_modes(Vec::<Mode>::new())).is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let legs = vec![
            leg("P", "C", "D", "12:00", "AIR", "GREEN"),
            leg("P", "A", "B", "06:00", "AIR", "GREEN"),
            leg("P", "E", "F", "09:00", "AIR", "GREEN"),
        ];
        let origins: Vec<&str> = filter_legs(&legs, &FilterParams::default())
            .iter()
            .map(|l| l.origin.as_str())
            .collect();
        assert_eq!(origins, vec!["C", "A", "E"]);
    }

    #[test]
    fn test_for_path_defaults() {
        let legs = vec![
            leg("P", "A", "B", "09:00", "AIR", "GREEN"),
            leg("P", "A", "B", "07:30", "AIR", "RED"),
            leg("Q", "A", "B", "05:00", "AIR", "RED"),
        ];
        let dataset = Dataset::new(legs, NodeTable::new());
        let params = FilterParams::for_path(&dataset, "P");

        assert_eq!(params.time_window, TimeWindow::Range { start: t("07:30"), end: t("09:00") });
        assert_eq!(filter_legs(dataset.legs(), &params).len(), 2);
    }

    #[test]
    fn test_params_from_json() {
        let params: FilterParams = serde_json::from_str(
            r#"{"path": "P", "sla": ["RED"], "time_window": {"policy": "hour_of_day", "start_hour": 18, "end_hour": 6}}"#,
        )
        .expect("should parse");
        assert_eq!(params.path.as_deref(), Some("P"));
        assert_eq!(params.sla, Some(SlaSet::RED));
        assert!(params.time_window.is_overnight());
        assert!(params.validate().is_ok());
    }
}
