//! Emission severity scoring.
//!
//! `score = 100 * (0.7 * severity + 0.3 * density)`, rounded to 2 decimals:
//! - severity: mean anomaly temperature above the raster mean, as a fraction
//!   of the raster's dynamic range, clamped to [0, 1]
//! - density: flagged cells over valid cells
//!
//! Cold anomalies score zero severity; only thermal excess counts.

use lst_common::Raster;
use serde::Serialize;
use tracing::debug;

use crate::set::AnomalySet;

pub const SEVERITY_WEIGHT: f64 = 0.7;
pub const DENSITY_WEIGHT: f64 = 0.3;

/// Components of an emission score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub severity: f64,
    pub density: f64,
    /// Final 0-100 score, rounded to two decimals.
    pub score: f64,
}

/// Emission score in [0, 100] for the flagged cells of `raster`.
///
/// Returns 0 when nothing is flagged, when no flagged cell holds a valid
/// sample, or when the raster has no dynamic range.
pub fn emission_score(raster: &Raster, anomalies: &AnomalySet) -> f64 {
    score_breakdown(raster, anomalies)
        .map(|b| b.score)
        .unwrap_or(0.0)
}

/// Score components, or `None` in any degenerate case that scores 0.
pub fn score_breakdown(raster: &Raster, anomalies: &AnomalySet) -> Option<ScoreBreakdown> {
    if anomalies.is_empty() {
        return None;
    }

    // Out-of-range or invalid positions are dropped
    let (sum, count) = anomalies
        .iter()
        .filter_map(|idx| raster.value_at(idx))
        .filter(|v| Raster::is_valid_sample(*v))
        .fold((0.0f64, 0usize), |(s, n), v| (s + v as f64, n + 1));
    if count == 0 {
        return None;
    }

    let stats = raster.stats()?;
    let range = stats.range();
    if range == 0.0 {
        debug!("Raster has no dynamic range, emission score is 0");
        return None;
    }

    let anomaly_mean = sum / count as f64;
    let severity = ((anomaly_mean - stats.mean) / range).clamp(0.0, 1.0);
    let density = count as f64 / stats.valid_count as f64;
    let score = round2(100.0 * (SEVERITY_WEIGHT * severity + DENSITY_WEIGHT * density));

    debug!(severity, density, score, "Computed emission score");

    Some(ScoreBreakdown {
        severity,
        density,
        score,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
