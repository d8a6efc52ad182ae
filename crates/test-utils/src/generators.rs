//! Synthetic land-surface-temperature rasters.
//!
//! All generators return row-major `Vec<f32>` samples in degrees Celsius,
//! with NaN as the missing-sample marker.

/// A uniform raster with a single hot cell at `(hot_row, hot_col)`.
///
/// # Example
///
/// ```
/// use test_utils::create_hotspot_grid;
///
/// let grid = create_hotspot_grid(10, 10, 20.0, 80.0, 4, 7);
/// assert_eq!(grid[4 * 10 + 7], 80.0);
/// assert_eq!(grid[0], 20.0);
/// ```
pub fn create_hotspot_grid(
    width: usize,
    height: usize,
    background: f32,
    hot_value: f32,
    hot_row: usize,
    hot_col: usize,
) -> Vec<f32> {
    let mut data = vec![background; width * height];
    data[hot_row * width + hot_col] = hot_value;
    data
}

/// A raster filled with a single value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// A raster where every sample is missing.
pub fn create_all_nan_grid(width: usize, height: usize) -> Vec<f32> {
    vec![f32::NAN; width * height]
}

/// A smooth daytime LST field (roughly 25..40 C) with deterministic texture.
///
/// Values rise from the top-left corner to the bottom-right corner with a
/// small sinusoidal ripple, so no single cell stands out.
pub fn create_lst_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x = col as f32 / width.max(1) as f32;
            let y = row as f32 / height.max(1) as f32;
            let ripple = ((col as f32 * 0.7).sin() + (row as f32 * 1.3).cos()) * 0.4;
            data.push(25.0 + (x * 0.4 + y * 0.6) * 15.0 + ripple);
        }
    }
    data
}

/// An LST field with a compact cluster of hot cells centred on `(row, col)`.
///
/// Cells within `radius` (Chebyshev distance) get `excess` degrees added.
pub fn create_lst_grid_with_plume(
    width: usize,
    height: usize,
    row: usize,
    col: usize,
    radius: usize,
    excess: f32,
) -> Vec<f32> {
    let mut data = create_lst_grid(width, height);
    for r in row.saturating_sub(radius)..=(row + radius).min(height - 1) {
        for c in col.saturating_sub(radius)..=(col + radius).min(width - 1) {
            data[r * width + c] += excess;
        }
    }
    data
}

/// Marks every `nth` sample (starting at `offset`) as missing.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    base: &[f32],
    nth: usize,
    offset: usize,
) -> Vec<f32> {
    assert_eq!(base.len(), width * height, "base grid has wrong size");
    base.iter()
        .enumerate()
        .map(|(i, &v)| {
            if nth > 0 && i >= offset && (i - offset) % nth == 0 {
                f32::NAN
            } else {
                v
            }
        })
        .collect()
}
