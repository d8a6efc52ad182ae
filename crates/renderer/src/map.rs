//! Interactive Leaflet map around the analysed site.
//!
//! The document pulls Leaflet and OpenStreetMap tiles from public CDNs; the
//! overlay image is embedded as a `data:` URI so the page stands alone.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lst_common::{BoundingBox, GeoPoint};

/// Half-width in degrees of the image overlay around the site.
pub const OVERLAY_SPAN_DEG: f64 = 0.05;

pub const DEFAULT_ZOOM: u8 = 12;
pub const DEFAULT_OPACITY: f64 = 0.6;
pub const DEFAULT_MARKER_LABEL: &str = "Factory Location";

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Image drawn over the base map.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverlay {
    pub href: String,
    pub bounds: BoundingBox,
    pub opacity: f64,
}

/// A single-page Leaflet map centered on a site.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub title: String,
    pub center: GeoPoint,
    pub zoom: u8,
    pub marker_label: String,
    pub overlay: Option<ImageOverlay>,
}

impl MapDocument {
    pub fn new(center: GeoPoint) -> Self {
        Self {
            title: "Thermal Anomaly Map".to_string(),
            center,
            zoom: DEFAULT_ZOOM,
            marker_label: DEFAULT_MARKER_LABEL.to_string(),
            overlay: None,
        }
    }

    /// Attach `href` as an overlay spanning [`OVERLAY_SPAN_DEG`] around the center.
    pub fn with_overlay(mut self, href: impl Into<String>) -> Self {
        self.overlay = Some(ImageOverlay {
            href: href.into(),
            bounds: overlay_bounds(self.center),
            opacity: DEFAULT_OPACITY,
        });
        self
    }

    /// Render the standalone HTML document.
    pub fn to_html(&self) -> String {
        let mut script = String::new();
        script.push_str(&format!(
            "var map = L.map('map', {{center: [{}, {}], zoom: {}}});\n",
            self.center.lat, self.center.lon, self.zoom
        ));
        script.push_str("L.control.scale().addTo(map);\n");
        script.push_str(&format!(
            "L.tileLayer({}, {{maxZoom: 19, attribution: {}}}).addTo(map);\n",
            js_string(TILE_URL),
            js_string(TILE_ATTRIBUTION)
        ));

        if let Some(overlay) = &self.overlay {
            let [[south, west], [north, east]] = overlay.bounds.leaflet_corners();
            script.push_str(&format!(
                "L.imageOverlay({}, [[{}, {}], [{}, {}]], {{opacity: {}, interactive: false}}).addTo(map);\n",
                js_string(&overlay.href),
                south,
                west,
                north,
                east,
                overlay.opacity
            ));
        }

        script.push_str(&format!(
            "L.marker([{}, {}]).addTo(map).bindTooltip({});\n",
            self.center.lat,
            self.center.lon,
            js_string(&self.marker_label)
        ));

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>{title}</title>
<link rel="stylesheet" href="{css}" />
<script src="{js}"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
{script}</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            script = script,
        )
    }
}

/// Overlay bounds: the site ± [`OVERLAY_SPAN_DEG`] on both axes.
pub fn overlay_bounds(center: GeoPoint) -> BoundingBox {
    BoundingBox::around_point_degrees(center, OVERLAY_SPAN_DEG)
}

/// Inline PNG bytes as a `data:image/png;base64,...` URI.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Quote a value as a JavaScript string literal.
fn js_string(value: &str) -> String {
    // JSON strings are valid JS literals; "</" would close the script tag
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
