//! Geographic point type.

use serde::{Deserialize, Serialize};

use crate::{LstError, LstResult};

/// Approximate length of one degree of latitude in meters.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside the valid lat/lon ranges.
    pub fn new(lat: f64, lon: f64) -> LstResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(LstError::invalid_parameter(
                "lat",
                format!("{} is outside [-90, 90]", lat),
            ));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(LstError::invalid_parameter(
                "lon",
                format!("{} is outside [-180, 180]", lon),
            ));
        }
        Ok(Self { lat, lon })
    }
}

/// Rough conversion of a ground distance to degrees of latitude.
///
/// Only valid for small distances.
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}
