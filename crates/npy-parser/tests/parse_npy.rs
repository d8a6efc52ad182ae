//! Integration tests for decoding `.npy` payloads into rasters.

use npy_parser::{parse_npy, parse_npy_file, read_header, NpyError};
use test_utils::{npy_f32, npy_f64, npy_with_descr, require_test_file, temp_test_dir};

// ============================================================================
// Happy paths
// ============================================================================

#[test]
fn test_parse_f32_2d() {
    let values: Vec<f32> = (0..12).map(|v| v as f32 * 0.5).collect();
    let raster = parse_npy(&npy_f32(&[3, 4], &values)).unwrap();

    assert_eq!(raster.shape(), (3, 4));
    assert_eq!(raster.get(2, 3), Some(5.5));
    assert_eq!(raster.data(), values.as_slice());
}

#[test]
fn test_parse_f64_normalizes_to_f32() {
    let values = [25.123456789f64, 31.0, f64::NAN, 40.25];
    let raster = parse_npy(&npy_f64(&[2, 2], &values)).unwrap();

    assert_eq!(raster.get(0, 0), Some(25.123456789f64 as f32));
    assert!(raster.get(1, 0).unwrap().is_nan());
    assert_eq!(raster.valid_count(), 3);
}

#[test]
fn test_parse_one_dimensional_is_single_row() {
    let raster = parse_npy(&npy_f32(&[5], &[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
    assert_eq!(raster.shape(), (1, 5));
}

#[test]
fn test_parse_single_band_3d() {
    let values = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
    let raster = parse_npy(&npy_f32(&[1, 2, 3], &values)).unwrap();
    assert_eq!(raster.shape(), (2, 3));

    let raster = parse_npy(&npy_f32(&[2, 3, 1], &values)).unwrap();
    assert_eq!(raster.shape(), (2, 3));
}

#[test]
fn test_parse_fortran_order() {
    // [[1, 2, 3], [4, 5, 6]] in column-major order
    let body: Vec<u8> = [1.0f32, 4.0, 2.0, 5.0, 3.0, 6.0]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();
    let raster = parse_npy(&npy_with_descr("'<f4'", &[2, 3], true, &body)).unwrap();

    assert_eq!(raster.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_parse_structured_single_band() {
    let body: Vec<u8> = [300.5f64, 301.0, 302.0, 303.0]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();
    let bytes = npy_with_descr("[('ST_B10', '<f8')]", &[2, 2], false, &body);

    let header = read_header(&bytes).unwrap();
    assert_eq!(header.dtype.field.as_deref(), Some("ST_B10"));

    let raster = parse_npy(&bytes).unwrap();
    assert_eq!(raster.get(0, 0), Some(300.5));
}

#[test]
fn test_parse_big_endian_int16() {
    let body: Vec<u8> = [-5i16, 0, 7, 1200]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect();
    let raster = parse_npy(&npy_with_descr("'>i2'", &[2, 2], false, &body)).unwrap();
    assert_eq!(raster.data(), &[-5.0, 0.0, 7.0, 1200.0]);
}

#[test]
fn test_parse_version_2_header() {
    let v1 = npy_f32(&[1, 2], &[10.0, 20.0]);
    let header_len = u16::from_le_bytes([v1[8], v1[9]]) as usize;

    let mut v2 = Vec::new();
    v2.extend_from_slice(b"\x93NUMPY");
    v2.extend_from_slice(&[2, 0]);
    v2.extend_from_slice(&(header_len as u32).to_le_bytes());
    v2.extend_from_slice(&v1[10..]);

    let header = read_header(&v2).unwrap();
    assert_eq!(header.version, (2, 0));
    assert_eq!(parse_npy(&v2).unwrap().data(), &[10.0, 20.0]);
}

#[test]
fn test_parse_npy_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("tile.npy");
    std::fs::write(&path, npy_f32(&[2, 2], &[1.0, 2.0, 3.0, 4.0])).unwrap();

    let raster = parse_npy_file(&path).unwrap();
    assert_eq!(raster.shape(), (2, 2));
}

#[test]
fn test_parse_real_export() {
    let path = require_test_file!("lst_sample.npy");
    let raster = parse_npy_file(&path).unwrap();
    assert!(raster.len() > 0);
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_bad_magic() {
    let mut bytes = npy_f32(&[1, 1], &[1.0]);
    bytes[1] = b'X';
    assert!(matches!(parse_npy(&bytes), Err(NpyError::InvalidMagic)));
    assert!(matches!(parse_npy(b"short"), Err(NpyError::InvalidMagic)));
}

#[test]
fn test_unsupported_version() {
    let mut bytes = npy_f32(&[1, 1], &[1.0]);
    bytes[6] = 9;
    assert!(matches!(
        parse_npy(&bytes),
        Err(NpyError::UnsupportedVersion(9, 0))
    ));
}

#[test]
fn test_truncated_body() {
    let mut bytes = npy_f32(&[4, 4], &[0.0; 16]);
    bytes.truncate(bytes.len() - 3);
    assert!(matches!(
        parse_npy(&bytes),
        Err(NpyError::Truncated { expected: 64, actual: 61 })
    ));
}

#[test]
fn test_multi_band_shape_rejected() {
    let bytes = npy_f32(&[2, 2, 2], &[0.0; 8]);
    assert!(matches!(
        parse_npy(&bytes),
        Err(NpyError::UnsupportedShape(_))
    ));
}

#[test]
fn test_empty_axis_rejected() {
    let bytes = npy_f32(&[0, 3], &[]);
    assert!(matches!(
        parse_npy(&bytes),
        Err(NpyError::UnsupportedShape(_))
    ));
}

#[test]
fn test_oversized_shape_rejected() {
    let bytes = npy_with_descr("'<f4'", &[1 << 32, 1 << 32], false, &[0u8; 16]);
    assert!(matches!(
        parse_npy(&bytes),
        Err(NpyError::UnsupportedShape(_))
    ));
}

#[test]
fn test_complex_dtype_rejected() {
    let bytes = npy_with_descr("'<c8'", &[1, 1], false, &[0u8; 8]);
    assert!(matches!(parse_npy(&bytes), Err(NpyError::UnsupportedDtype(_))));
}

#[test]
fn test_error_converts_to_lst_error() {
    let err: lst_common::LstError = NpyError::InvalidMagic.into();
    assert!(matches!(err, lst_common::LstError::DataReadError(_)));
}
