//! Heat colormap rendering for LST rasters.

use rayon::prelude::*;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Same color with alpha scaled by `opacity` in [0, 1].
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }
}

/// Knots of the `hot` colormap: red ramps first, then green, then blue.
const HOT_RED_END: f32 = 0.365_079;
const HOT_GREEN_END: f32 = 0.746_032;

/// `hot` colormap: black -> red -> yellow -> white over a normalized value.
pub fn hot_color(norm: f32) -> Color {
    let t = if norm.is_nan() { 0.0 } else { norm.clamp(0.0, 1.0) };
    let channel = |lo: f32, hi: f32| (((t - lo) / (hi - lo)).clamp(0.0, 1.0) * 255.0).round() as u8;

    Color::new(
        channel(0.0, HOT_RED_END),
        channel(HOT_RED_END, HOT_GREEN_END),
        channel(HOT_GREEN_END, 1.0),
        255,
    )
}

/// Render grid data through a colormap.
///
/// # Arguments
/// - `data`: 2D grid of values (row-major order)
/// - `width`: Number of columns
/// - `height`: Number of rows
/// - `min_val`, `max_val`: value range mapped onto [0, 1]
/// - `color_fn`: converts a normalized value to a color
///
/// Non-finite samples are left fully transparent. A flat range maps every
/// sample to 0.
///
/// # Returns
/// RGBA pixel data (4 bytes per pixel)
pub fn render_grid<F>(
    data: &[f32],
    width: usize,
    height: usize,
    min_val: f32,
    max_val: f32,
    color_fn: F,
) -> Vec<u8>
where
    F: Fn(f32) -> Color + Sync,
{
    let mut pixels = vec![0u8; width * height * 4];
    let range = max_val - min_val;

    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let Some(&value) = data.get(y * width + x) else {
                    continue;
                };
                if !value.is_finite() {
                    continue;
                }
                let normalized = if range > 0.0 {
                    ((value - min_val) / range).clamp(0.0, 1.0)
                } else {
                    0.0
                };

                let color = color_fn(normalized);
                let p = x * 4;
                row[p] = color.r;
                row[p + 1] = color.g;
                row[p + 2] = color.b;
                row[p + 3] = color.a;
            }
        });

    pixels
}

/// Render an LST grid with the `hot` colormap.
pub fn render_heat(data: &[f32], width: usize, height: usize, min_temp: f32, max_temp: f32) -> Vec<u8> {
    render_grid(data, width, height, min_temp, max_temp, hot_color)
}

/// Enlarge RGBA pixels by an integer factor with nearest-neighbour sampling.
///
/// # Returns
/// Upscaled pixels and the new `(width, height)`
pub fn upscale_nearest(
    pixels: &[u8],
    width: usize,
    height: usize,
    factor: usize,
) -> (Vec<u8>, usize, usize) {
    if factor <= 1 {
        return (pixels.to_vec(), width, height);
    }

    let out_w = width * factor;
    let out_h = height * factor;
    let mut out = vec![0u8; out_w * out_h * 4];

    out.par_chunks_mut(out_w * 4)
        .enumerate()
        .for_each(|(oy, row)| {
            let sy = oy / factor;
            for ox in 0..out_w {
                let src = (sy * width + ox / factor) * 4;
                row[ox * 4..ox * 4 + 4].copy_from_slice(&pixels[src..src + 4]);
            }
        });

    (out, out_w, out_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_endpoints() {
        assert_eq!(hot_color(0.0), Color::new(0, 0, 0, 255));
        assert_eq!(hot_color(1.0), Color::new(255, 255, 255, 255));
        assert_eq!(hot_color(HOT_RED_END), Color::new(255, 0, 0, 255));
        assert_eq!(hot_color(HOT_GREEN_END), Color::new(255, 255, 0, 255));
    }

    #[test]
    fn test_with_opacity() {
        let c = Color::new(0, 255, 255, 255).with_opacity(0.6);
        assert_eq!(c.a, 153);
    }

    #[test]
    fn test_nan_is_transparent() {
        let pixels = render_heat(&[f32::NAN, 10.0], 2, 1, 0.0, 10.0);
        assert_eq!(&pixels[0..4], &[0, 0, 0, 0]);
        assert_eq!(&pixels[4..8], &[255, 255, 255, 255]);
    }
}
