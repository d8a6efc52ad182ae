//! Scene search parameters.

use chrono::{Duration, NaiveDate, Utc};
use lst_common::{BoundingBox, GeoPoint, LstError, LstResult};

pub const DEFAULT_RADIUS_M: f64 = 300.0;
pub const DEFAULT_WINDOW_DAYS: u32 = 60;
pub const DEFAULT_MAX_CLOUD_COVER: f64 = 40.0;

/// Where and when to look for scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneQuery {
    pub point: GeoPoint,
    /// Buffer radius around the point, in meters.
    pub radius_m: f64,
    /// Recency window ending at `end_date`, in days.
    pub window_days: u32,
    /// Scenes with a cloud percentage at or above this are skipped.
    pub max_cloud_cover: f64,
    pub end_date: NaiveDate,
}

impl SceneQuery {
    /// Query with default radius, window and cloud limit, ending today (UTC).
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            radius_m: DEFAULT_RADIUS_M,
            window_days: DEFAULT_WINDOW_DAYS,
            max_cloud_cover: DEFAULT_MAX_CLOUD_COVER,
            end_date: Utc::now().date_naive(),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.end_date - Duration::days(self.window_days as i64)
    }

    /// Square region covering the buffer around the point.
    pub fn region(&self) -> BoundingBox {
        BoundingBox::around_point(self.point, self.radius_m)
    }

    pub fn validate(&self) -> LstResult<()> {
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(LstError::invalid_parameter(
                "radius_m",
                format!("{} must be a positive distance", self.radius_m),
            ));
        }
        if self.window_days == 0 {
            return Err(LstError::invalid_parameter(
                "window_days",
                "must be at least one day",
            ));
        }
        if !(0.0..=100.0).contains(&self.max_cloud_cover) {
            return Err(LstError::invalid_parameter(
                "max_cloud_cover",
                format!("{} is outside [0, 100]", self.max_cloud_cover),
            ));
        }
        Ok(())
    }

    /// Key/value pairs describing this query to an imagery gateway.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lat", self.point.lat.to_string()),
            ("lon", self.point.lon.to_string()),
            ("radius_m", self.radius_m.to_string()),
            ("bbox", self.region().to_query_param()),
            ("start", self.start_date().format("%Y-%m-%d").to_string()),
            ("end", self.end_date.format("%Y-%m-%d").to_string()),
            ("max_cloud", self.max_cloud_cover.to_string()),
        ]
    }
}
