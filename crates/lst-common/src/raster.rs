//! Single-channel temperature rasters.
//!
//! A [`Raster`] is a row-major grid of `f32` samples. Missing samples (cloud
//! cover, scan gaps) are stored as NaN; any non-finite sample is treated as
//! invalid and excluded from statistics.

use serde::{Deserialize, Serialize};

use crate::{LstError, LstResult};

/// A 2-D grid of temperature samples in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Raster {
    /// Create a raster from row-major samples.
    ///
    /// Fails if either dimension is zero or the sample count does not match.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> LstResult<Self> {
        if width == 0 || height == 0 {
            return Err(LstError::InvalidShape(format!(
                "raster must be at least 1x1, got {}x{}",
                height, width
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            LstError::InvalidShape(format!("{}x{} overflows usize", height, width))
        })?;
        if data.len() != expected {
            return Err(LstError::InvalidShape(format!(
                "{}x{} raster needs {} samples, got {}",
                height,
                width,
                expected,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a raster with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> LstResult<Self> {
        Self::new(width, height, vec![value; width.saturating_mul(height)])
    }

    /// Create a raster from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> LstResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(LstError::InvalidShape(format!(
                "row {} has {} samples, expected {}",
                bad,
                rows[bad].len(),
                width
            )));
        }
        Self::new(width, height, rows.into_iter().flatten().collect())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Total number of samples, valid or not.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// A raster always has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major sample slice.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Consume the raster, returning its samples.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Sample at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.data[self.flat_index(row, col)])
    }

    /// Sample at a flat row-major index.
    pub fn value_at(&self, flat: usize) -> Option<f32> {
        self.data.get(flat).copied()
    }

    /// Row-major flat index of `(row, col)`.
    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Inverse of [`Raster::flat_index`].
    pub fn unravel(&self, flat: usize) -> (usize, usize) {
        (flat / self.width, flat % self.width)
    }

    /// Whether a sample is a real measurement.
    #[inline]
    pub fn is_valid_sample(value: f32) -> bool {
        value.is_finite()
    }

    /// Number of valid samples.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| Self::is_valid_sample(**v)).count()
    }

    /// Valid samples paired with their flat positions.
    pub fn valid_view(&self) -> ValidView {
        let mut values = Vec::with_capacity(self.data.len());
        let mut positions = Vec::with_capacity(self.data.len());
        for (idx, &v) in self.data.iter().enumerate() {
            if Self::is_valid_sample(v) {
                values.push(v as f64);
                positions.push(idx);
            }
        }
        ValidView { values, positions }
    }

    /// Summary statistics over the valid samples.
    pub fn stats(&self) -> Option<RasterStats> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for &v in &self.data {
            if !Self::is_valid_sample(v) {
                continue;
            }
            let v = v as f64;
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(RasterStats {
            min,
            max,
            mean: sum / count as f64,
            valid_count: count,
            total_count: self.data.len(),
        })
    }

    /// Apply `f` to every valid sample, leaving invalid samples untouched.
    ///
    /// Results that are not finite become NaN.
    pub fn map_valid<F>(mut self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        for v in self.data.iter_mut() {
            if Self::is_valid_sample(*v) {
                let mapped = f(*v);
                *v = if mapped.is_finite() { mapped } else { f32::NAN };
            } else {
                *v = f32::NAN;
            }
        }
        self
    }
}

/// The valid samples of a raster, flattened, with their original positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidView {
    /// Valid sample values, widened to `f64`.
    pub values: Vec<f64>,
    /// Flat raster index of each entry in `values`.
    pub positions: Vec<usize>,
}

impl ValidView {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Statistics over the valid samples of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub valid_count: usize,
    pub total_count: usize,
}

impl RasterStats {
    /// Dynamic range `max - min`.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Fraction of samples that are valid.
    pub fn coverage(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.valid_count as f64 / self.total_count as f64
        }
    }
}
