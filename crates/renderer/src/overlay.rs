//! Anomaly overlay: heat-mapped LST raster with hotspot markers.

use anomaly::AnomalySet;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, Blend};
use lst_common::{LstError, LstResult, Raster};
use tracing::debug;

use crate::gradient::{render_heat, upscale_nearest, Color};
use crate::png::create_png_auto;

/// Longest side the overlay is enlarged towards.
pub const TARGET_SIZE: usize = 500;

/// Visual parameters of the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    /// Integer upscale factor; `None` picks one from [`TARGET_SIZE`].
    pub scale: Option<usize>,
    /// Marker radius in output pixels; `None` derives it from the scale.
    pub marker_radius: Option<u32>,
    pub marker_color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            scale: None,
            marker_radius: None,
            marker_color: Color::new(0, 255, 255, 255).with_opacity(0.6),
        }
    }
}

impl OverlayStyle {
    fn scale_for(&self, raster: &Raster) -> usize {
        self.scale
            .unwrap_or_else(|| TARGET_SIZE / raster.width().max(raster.height()).max(1))
            .max(1)
    }

    fn radius_for(&self, scale: usize) -> u32 {
        self.marker_radius.unwrap_or((scale / 4).max(2) as u32)
    }
}

/// A rendered overlay and the grid-to-pixel scale it was drawn at.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub image: RgbaImage,
    pub scale: usize,
}

impl Overlay {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> LstResult<Vec<u8>> {
        create_png_auto(
            self.image.as_raw(),
            self.image.width() as usize,
            self.image.height() as usize,
        )
        .map_err(LstError::RenderError)
    }
}

/// Render `raster` with the `hot` colormap and mark every anomaly.
///
/// Colors are stretched over the valid min..max; invalid cells stay fully
/// transparent. Markers are alpha-blended onto the heat map at cell centers.
pub fn render_overlay(
    raster: &Raster,
    anomalies: &AnomalySet,
    style: &OverlayStyle,
) -> LstResult<Overlay> {
    if raster.is_empty() {
        return Err(LstError::RenderError("cannot render an empty raster".into()));
    }

    let (min, max) = raster
        .stats()
        .map(|s| (s.min as f32, s.max as f32))
        .unwrap_or((0.0, 0.0));

    let heat = render_heat(raster.data(), raster.width(), raster.height(), min, max);
    let scale = style.scale_for(raster);
    let (pixels, width, height) = upscale_nearest(&heat, raster.width(), raster.height(), scale);

    let image = RgbaImage::from_raw(width as u32, height as u32, pixels).ok_or_else(|| {
        LstError::RenderError(format!("pixel buffer does not fit {}x{}", width, height))
    })?;

    let radius = style.radius_for(scale) as i32;
    let c = style.marker_color;
    let marker = Rgba([c.r, c.g, c.b, c.a]);

    let mut canvas = Blend(image);
    for (row, col) in anomalies.coordinates(raster) {
        let center = (
            (col * scale + scale / 2) as i32,
            (row * scale + scale / 2) as i32,
        );
        draw_filled_circle_mut(&mut canvas, center, radius, marker);
    }

    debug!(
        width,
        height,
        scale,
        markers = anomalies.len(),
        "Rendered anomaly overlay"
    );

    Ok(Overlay {
        image: canvas.0,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_targets_500() {
        let style = OverlayStyle::default();
        let raster = Raster::filled(20, 10, 1.0).unwrap();
        assert_eq!(style.scale_for(&raster), 25);

        let big = Raster::filled(800, 600, 1.0).unwrap();
        assert_eq!(style.scale_for(&big), 1);
    }

    #[test]
    fn test_marker_color_is_translucent_cyan() {
        let c = OverlayStyle::default().marker_color;
        assert_eq!((c.r, c.g, c.b, c.a), (0, 255, 255, 153));
    }
}
