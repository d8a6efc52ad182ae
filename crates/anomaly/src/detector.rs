//! Raster hotspot detection.
//!
//! Valid samples are treated as independent single-feature observations.
//! An isolation forest is fitted on them and every sample whose anomaly
//! score is strictly above the `(1 - contamination)` quantile of the
//! training scores is flagged. Flags are mapped back to flat raster
//! positions; invalid cells are never flagged.

use lst_common::{LstError, LstResult, Raster};
use tracing::{debug, info};

use crate::forest::{quantile, ForestParams, IsolationForest, DEFAULT_MAX_SAMPLES};
use crate::set::AnomalySet;

/// Detector configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Expected proportion of outliers, strictly inside (0, 1).
    pub contamination: f64,
    /// Number of isolation trees.
    pub n_estimators: usize,
    /// Per-tree sub-sample size cap.
    pub max_samples: usize,
    /// Seed for reproducible fits.
    pub seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contamination: 0.05,
            n_estimators: 200,
            max_samples: DEFAULT_MAX_SAMPLES,
            seed: 42,
        }
    }
}

impl DetectorConfig {
    /// Default configuration with a different contamination fraction.
    pub fn with_contamination(contamination: f64) -> Self {
        Self {
            contamination,
            ..Self::default()
        }
    }

    /// Reject configurations the detector cannot honour.
    pub fn validate(&self) -> LstResult<()> {
        if !(self.contamination > 0.0 && self.contamination < 1.0) {
            return Err(LstError::invalid_parameter(
                "contamination",
                format!("{} must lie strictly between 0 and 1", self.contamination),
            ));
        }
        if self.n_estimators == 0 {
            return Err(LstError::invalid_parameter(
                "n_estimators",
                "at least one tree is required",
            ));
        }
        if self.max_samples == 0 {
            return Err(LstError::invalid_parameter(
                "max_samples",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            max_samples: self.max_samples,
            seed: self.seed,
        }
    }
}

/// Result of one detection run: the analysed raster and its flagged cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub raster: Raster,
    pub anomalies: AnomalySet,
}

/// Flags anomalous cells of LST rasters.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    /// Create a detector, failing fast on an invalid configuration.
    pub fn new(config: DetectorConfig) -> LstResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run detection, handing the raster back alongside the anomaly set.
    pub fn detect(&self, raster: Raster) -> Detection {
        let anomalies = self.flag(&raster);
        Detection { raster, anomalies }
    }

    /// Flat indices of anomalous cells.
    ///
    /// A raster without valid samples yields an empty set.
    pub fn flag(&self, raster: &Raster) -> AnomalySet {
        let view = raster.valid_view();
        if view.is_empty() {
            debug!(
                rows = raster.height(),
                cols = raster.width(),
                "No valid samples, skipping detection"
            );
            return AnomalySet::empty();
        }

        let forest = IsolationForest::fit(&view.values, &self.config.forest_params());
        let scores = forest.score_samples(&view.values);

        let anomalies: AnomalySet = match quantile(&scores, 1.0 - self.config.contamination) {
            Some(threshold) => scores
                .iter()
                .zip(&view.positions)
                .filter(|(score, _)| **score > threshold)
                .map(|(_, &pos)| pos)
                .collect(),
            None => AnomalySet::empty(),
        };

        info!(
            valid = view.len(),
            total = raster.len(),
            anomalies = anomalies.len(),
            contamination = self.config.contamination,
            "Anomaly detection complete"
        );

        anomalies
    }
}

/// Detect anomalies with default forest settings and the given contamination.
pub fn analyze_anomalies(raster: Raster, contamination: f64) -> LstResult<Detection> {
    let detector = AnomalyDetector::new(DetectorConfig::with_contamination(contamination))?;
    Ok(detector.detect(raster))
}
