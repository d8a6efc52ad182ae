//! Common types shared across the thermal hotspot crates.

pub mod bbox;
pub mod error;
pub mod geo;
pub mod raster;

pub use bbox::BoundingBox;
pub use error::{LstError, LstResult};
pub use geo::GeoPoint;
pub use raster::{Raster, RasterStats, ValidView};
