//! Image and map output for thermal hotspot analysis.
//!
//! - `gradient`: `hot` colormap rendering of LST grids
//! - `overlay`: heat map with anomaly markers
//! - `png`: indexed/RGBA PNG encoding
//! - `map`: Leaflet HTML page carrying the overlay

pub mod gradient;
pub mod map;
pub mod overlay;
pub mod png;

pub use map::{overlay_bounds, png_data_uri, ImageOverlay, MapDocument};
pub use overlay::{render_overlay, Overlay, OverlayStyle};
