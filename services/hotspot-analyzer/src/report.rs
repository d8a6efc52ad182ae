//! Analysis summary written as `report.json`.

use chrono::{DateTime, Utc};
use lst_common::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub latitude: f64,
    pub longitude: f64,
    pub source: String,
    pub rows: usize,
    pub cols: usize,
    pub anomaly_pixels: usize,
    /// Statistics over valid samples, in degrees Celsius; absent without any.
    pub max_lst_c: Option<f64>,
    pub min_lst_c: Option<f64>,
    pub mean_lst_c: Option<f64>,
    pub severity: f64,
    pub density: f64,
    pub emission_score: f64,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn new(point: GeoPoint, analysis: &Analysis) -> Self {
        let raster = analysis.raster();
        let stats = raster.stats();
        let breakdown = analysis.breakdown;

        Self {
            latitude: point.lat,
            longitude: point.lon,
            source: analysis.source.clone(),
            rows: raster.height(),
            cols: raster.width(),
            anomaly_pixels: analysis.detection.anomalies.len(),
            max_lst_c: stats.map(|s| s.max),
            min_lst_c: stats.map(|s| s.min),
            mean_lst_c: stats.map(|s| s.mean),
            severity: breakdown.map(|b| b.severity).unwrap_or(0.0),
            density: breakdown.map(|b| b.density).unwrap_or(0.0),
            emission_score: analysis.emission_score(),
            generated_at: Utc::now(),
        }
    }

    /// Human-readable summary for the terminal.
    pub fn summary(&self) -> String {
        let fmt = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "n/a".into());
        format!(
            "Site:            {:.6}, {:.6}\n\
             Source:          {}\n\
             Raster:          {} x {}\n\
             Anomaly pixels:  {}\n\
             Max LST (°C):    {}\n\
             Min LST (°C):    {}\n\
             Mean LST (°C):   {}\n\
             Emission score:  {:.2}",
            self.latitude,
            self.longitude,
            self.source,
            self.rows,
            self.cols,
            self.anomaly_pixels,
            fmt(self.max_lst_c),
            fmt(self.min_lst_c),
            fmt(self.mean_lst_c),
            self.emission_score
        )
    }
}
