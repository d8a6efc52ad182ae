//! Thermal anomaly detection and severity scoring.
//!
//! - [`forest`]: a single-feature isolation forest
//! - [`detector`]: flags anomalous raster cells with the forest
//! - [`score`]: folds the flagged cells into a 0-100 emission score

pub mod detector;
pub mod forest;
pub mod score;
pub mod set;

pub use detector::{analyze_anomalies, AnomalyDetector, Detection, DetectorConfig};
pub use forest::{ForestParams, IsolationForest};
pub use score::{emission_score, score_breakdown, ScoreBreakdown};
pub use set::AnomalySet;
