//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::geo::{meters_to_degrees, GeoPoint};

/// A geographic bounding box in decimal degrees (x = longitude, y = latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Square bounds of a circular buffer of `radius_m` meters around `point`.
    ///
    /// The longitude half-width is widened by `1 / cos(lat)` so the box stays
    /// roughly square on the ground away from the equator.
    pub fn around_point(point: GeoPoint, radius_m: f64) -> Self {
        let half_lat = meters_to_degrees(radius_m);
        let cos_lat = point.lat.to_radians().cos().max(1e-6);
        let half_lon = (half_lat / cos_lat).min(180.0);

        Self {
            min_x: point.lon - half_lon,
            min_y: (point.lat - half_lat).max(-90.0),
            max_x: point.lon + half_lon,
            max_y: (point.lat + half_lat).min(90.0),
        }
    }

    /// Bounds spanning `span_deg` degrees on every side of `point`.
    pub fn around_point_degrees(point: GeoPoint, span_deg: f64) -> Self {
        Self {
            min_x: point.lon - span_deg,
            min_y: point.lat - span_deg,
            max_x: point.lon + span_deg,
            max_y: point.lat + span_deg,
        }
    }

    /// Width of the bounding box in degrees.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Centre of the box.
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.min_y + self.max_y) / 2.0,
            lon: (self.min_x + self.max_x) / 2.0,
        }
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Corner pairs in Leaflet order: `[[south, west], [north, east]]`.
    pub fn leaflet_corners(&self) -> [[f64; 2]; 2] {
        [[self.min_y, self.min_x], [self.max_y, self.max_x]]
    }

    /// Query parameter form: "minx,miny,maxx,maxy" with 6 decimals.
    pub fn to_query_param(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
