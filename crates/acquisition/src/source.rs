//! Imagery sources and how their raw samples map to degrees Celsius.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kelvin to Celsius offset.
pub const KELVIN_OFFSET: f64 = 273.15;

/// A satellite product that can yield a land-surface-temperature raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LstSource {
    /// Landsat 9 Collection 2 Level-2 surface temperature.
    Landsat,
    /// Sentinel-2 surface reflectance, SWIR bands as a relative heat proxy.
    Sentinel,
}

impl LstSource {
    pub const ALL: [LstSource; 2] = [LstSource::Landsat, LstSource::Sentinel];

    pub fn as_str(&self) -> &'static str {
        match self {
            LstSource::Landsat => "landsat",
            LstSource::Sentinel => "sentinel",
        }
    }

    /// Built-in product definition for this source.
    pub fn default_definition(self) -> SourceDefinition {
        match self {
            LstSource::Landsat => SourceDefinition {
                kind: self,
                collection: "LANDSAT/LC09/C02/T1_L2".to_string(),
                bands: vec!["ST_B10".to_string()],
                cloud_property: "CLOUD_COVER".to_string(),
                scale_m: 30.0,
                gain: 0.003_418_02,
                offset: 149.0 - KELVIN_OFFSET,
            },
            // B11/B12 averaged by the gateway; only meaningful relatively
            LstSource::Sentinel => SourceDefinition {
                kind: self,
                collection: "COPERNICUS/S2_SR".to_string(),
                bands: vec!["B11".to_string(), "B12".to_string()],
                cloud_property: "CLOUDY_PIXEL_PERCENTAGE".to_string(),
                scale_m: 20.0,
                gain: 1.0,
                offset: -KELVIN_OFFSET,
            },
        }
    }
}

impl fmt::Display for LstSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LstSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landsat" => Ok(LstSource::Landsat),
            "sentinel" => Ok(LstSource::Sentinel),
            other => Err(format!("unknown source '{}'", other)),
        }
    }
}

/// Catalog product parameters for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDefinition {
    pub kind: LstSource,
    pub collection: String,
    pub bands: Vec<String>,
    /// Scene metadata property holding the cloud percentage.
    pub cloud_property: String,
    /// Sampling scale in meters.
    pub scale_m: f64,
    pub gain: f64,
    pub offset: f64,
}

impl SourceDefinition {
    /// Convert a raw sample to degrees Celsius.
    pub fn calibrate(&self, raw: f32) -> f32 {
        (raw as f64 * self.gain + self.offset) as f32
    }
}

/// Which sources to try, and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePreference {
    /// Landsat first, Sentinel as fallback.
    #[default]
    Auto,
    Landsat,
    Sentinel,
}

impl SourcePreference {
    pub fn order(&self) -> &'static [LstSource] {
        match self {
            SourcePreference::Auto => &LstSource::ALL,
            SourcePreference::Landsat => &[LstSource::Landsat],
            SourcePreference::Sentinel => &[LstSource::Sentinel],
        }
    }
}

impl FromStr for SourcePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SourcePreference::Auto),
            "landsat" => Ok(SourcePreference::Landsat),
            "sentinel" => Ok(SourcePreference::Sentinel),
            other => Err(format!(
                "unknown source preference '{}' (expected auto, landsat or sentinel)",
                other
            )),
        }
    }
}

impl fmt::Display for SourcePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePreference::Auto => f.write_str("auto"),
            SourcePreference::Landsat => f.write_str("landsat"),
            SourcePreference::Sentinel => f.write_str("sentinel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_order() {
        assert_eq!(
            SourcePreference::Auto.order(),
            &[LstSource::Landsat, LstSource::Sentinel]
        );
        assert_eq!(SourcePreference::Sentinel.order(), &[LstSource::Sentinel]);
    }

    #[test]
    fn test_parse_preference() {
        assert_eq!("AUTO".parse::<SourcePreference>(), Ok(SourcePreference::Auto));
        assert_eq!(" landsat ".parse::<SourcePreference>(), Ok(SourcePreference::Landsat));
        assert!("modis".parse::<SourcePreference>().is_err());
    }

    #[test]
    fn test_landsat_calibration() {
        let landsat = LstSource::Landsat.default_definition();
        // DN 44000 -> 149 + 150.393 K -> ~26.243 C
        let c = landsat.calibrate(44000.0);
        assert!((c - 26.2429).abs() < 1e-3, "got {}", c);
    }

    #[test]
    fn test_sentinel_calibration() {
        let sentinel = LstSource::Sentinel.default_definition();
        assert!((sentinel.calibrate(300.0) - 26.85).abs() < 1e-4);
        assert_eq!(sentinel.bands, vec!["B11", "B12"]);
    }
}
