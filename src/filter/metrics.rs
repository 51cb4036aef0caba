use serde::Serialize;

use crate::models::{ConnectionLeg, RiskWeights, SlaColor};

/// SLA breakdown and risk score of a filtered leg set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SlaMetrics {
    pub total: usize,
    pub red: usize,
    pub orange: usize,
    pub green: usize,
    /// Legs with an SLA value outside RED/ORANGE/GREEN; part of `total` only
    pub unclassified: usize,
    /// Weighted mean severity, lower is better; 0 for an empty set
    pub risk_score: f64,
}

impl SlaMetrics {
    /// Count legs per SLA color and compute the risk score
    #[must_use]
    pub fn compute<'a, I>(legs: I, weights: &RiskWeights) -> Self
    where
        I: IntoIterator<Item = &'a ConnectionLeg>,
    {
        let mut metrics = Self::default();
        for leg in legs {
            metrics.total += 1;
            match leg.sla_color() {
                Some(SlaColor::Red) => metrics.red += 1,
                Some(SlaColor::Orange) => metrics.orange += 1,
                Some(SlaColor::Green) => metrics.green += 1,
                None => metrics.unclassified += 1,
            }
        }
        metrics.risk_score = risk_score(metrics.red, metrics.orange, metrics.green, metrics.total, weights);
        metrics
    }

    #[must_use]
    pub const fn count(&self, color: SlaColor) -> usize {
        match color {
            SlaColor::Red => self.red,
            SlaColor::Orange => self.orange,
            SlaColor::Green => self.green,
        }
    }

    /// Share of `color` in percent, 0 when the set is empty
    #[must_use]
    pub fn percentage(&self, color: SlaColor) -> f64 {
        percentage(self.count(color), self.total)
    }

    /// Percentage with one decimal, e.g. "37.5%", or "0%" when the set is empty
    #[must_use]
    pub fn format_percentage(&self, color: SlaColor) -> String {
        if self.total == 0 {
            return "0%".to_string();
        }
        format!("{:.1}%", self.percentage(color))
    }

    #[must_use]
    pub fn format_risk_score(&self) -> String {
        format!("{:.2}", self.risk_score)
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// `(red*w_r + orange*w_o + green*w_g) / max(total, 1)`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn risk_score(red: usize, orange: usize, green: usize, total: usize, weights: &RiskWeights) -> f64 {
    let weighted = red as f64 * weights.red + orange as f64 * weights.orange + green as f64 * weights.green;
    weighted / total.max(1) as f64
}
