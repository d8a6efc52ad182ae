//! NumPy `.npy` decoder for single-band LST rasters.
//!
//! Earth-imagery services export small raster tiles as `.npy` arrays. This
//! crate turns such a payload into a [`Raster`], normalizing every sample
//! to `f32` and keeping non-finite samples as the missing marker.
//!
//! Format reference: the NumPy NEP-1 `.npy` description. Versions 1.0, 2.0
//! and 3.0 are accepted.

pub mod dtype;
pub mod header;

use std::path::Path;

use lst_common::{LstError, Raster};
use thiserror::Error;
use tracing::debug;

pub use dtype::{ByteOrder, Dtype, ScalarKind};
pub use header::{read_header, NpyHeader};

/// Errors produced while decoding a `.npy` payload.
#[derive(Debug, Error)]
pub enum NpyError {
    #[error("Not an NPY payload (bad magic bytes)")]
    InvalidMagic,

    #[error("Unsupported NPY format version {0}.{1}")]
    UnsupportedVersion(u8, u8),

    #[error("Invalid NPY header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported dtype: {0}")]
    UnsupportedDtype(String),

    #[error("Unsupported array shape: {0}")]
    UnsupportedShape(String),

    #[error("Truncated NPY data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NpyError> for LstError {
    fn from(err: NpyError) -> Self {
        LstError::DataReadError(err.to_string())
    }
}

/// Decode a `.npy` payload into a row-major raster.
pub fn parse_npy(data: &[u8]) -> Result<Raster, NpyError> {
    let header = read_header(data)?;
    let (rows, cols) = raster_dims(&header.shape)?;

    let itemsize = header.dtype.itemsize();
    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(itemsize))
        .ok_or_else(|| {
            NpyError::UnsupportedShape(format!(
                "{}x{} samples of {} bytes overflow the addressable size",
                rows, cols, itemsize
            ))
        })?;
    let body = &data[header.data_offset..];
    if body.len() < expected {
        return Err(NpyError::Truncated {
            expected,
            actual: body.len(),
        });
    }

    let mut samples: Vec<f32> = body[..expected]
        .chunks_exact(itemsize)
        .map(|chunk| header.dtype.decode(chunk))
        .collect();

    if header.fortran_order && rows > 1 && cols > 1 {
        samples = column_major_to_row_major(&samples, rows, cols);
    }

    debug!(
        rows,
        cols,
        dtype = %header.dtype,
        fortran_order = header.fortran_order,
        "Decoded NPY raster"
    );

    Raster::new(cols, rows, samples).map_err(|e| NpyError::UnsupportedShape(e.to_string()))
}

/// Read and decode a `.npy` file.
pub fn parse_npy_file<P: AsRef<Path>>(path: P) -> Result<Raster, NpyError> {
    let data = std::fs::read(path.as_ref())?;
    parse_npy(&data)
}

/// Reduce an array shape to `(rows, cols)`.
///
/// 1-D arrays become a single row; 3-D arrays are accepted when one outer
/// axis is a single band.
fn raster_dims(shape: &[usize]) -> Result<(usize, usize), NpyError> {
    let dims = match *shape {
        [n] => (1, n),
        [rows, cols] => (rows, cols),
        [1, rows, cols] => (rows, cols),
        [rows, cols, 1] => (rows, cols),
        _ => {
            return Err(NpyError::UnsupportedShape(format!(
                "{:?} is not a single-band 2-D raster",
                shape
            )))
        }
    };

    if dims.0 == 0 || dims.1 == 0 {
        return Err(NpyError::UnsupportedShape(format!(
            "{:?} has an empty axis",
            shape
        )));
    }
    Ok(dims)
}

fn column_major_to_row_major(samples: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; rows * cols];
    for col in 0..cols {
        for row in 0..rows {
            out[row * cols + col] = samples[col * rows + row];
        }
    }
    out
}
