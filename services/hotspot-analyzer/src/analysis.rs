//! Detection and scoring of one raster.

use anomaly::{score_breakdown, AnomalyDetector, Detection, DetectorConfig, ScoreBreakdown};
use lst_common::{LstResult, Raster};
use tracing::info;

/// Outcome of analysing one raster.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Where the raster came from (`landsat`, `sentinel`, or a file path).
    pub source: String,
    pub detection: Detection,
    /// Score components; `None` when the score is 0 by definition.
    pub breakdown: Option<ScoreBreakdown>,
}

impl Analysis {
    pub fn raster(&self) -> &Raster {
        &self.detection.raster
    }

    pub fn emission_score(&self) -> f64 {
        self.breakdown.map(|b| b.score).unwrap_or(0.0)
    }
}

/// Flag anomalies in `raster` and score them.
pub fn analyze(
    raster: Raster,
    source: impl Into<String>,
    config: DetectorConfig,
) -> LstResult<Analysis> {
    let detector = AnomalyDetector::new(config)?;
    let detection = detector.detect(raster);
    let breakdown = score_breakdown(&detection.raster, &detection.anomalies);

    let analysis = Analysis {
        source: source.into(),
        detection,
        breakdown,
    };

    info!(
        source = %analysis.source,
        anomalies = analysis.detection.anomalies.len(),
        score = analysis.emission_score(),
        "Analysis complete"
    );

    Ok(analysis)
}
