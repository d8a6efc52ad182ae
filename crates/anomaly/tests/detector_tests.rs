//! Integration tests for raster anomaly detection.

use anomaly::{analyze_anomalies, AnomalyDetector, DetectorConfig};
use lst_common::{LstError, Raster};
use test_utils::{
    create_all_nan_grid, create_constant_grid, create_grid_with_nans, create_hotspot_grid,
    create_lst_grid, create_lst_grid_with_plume,
};

fn raster(width: usize, height: usize, data: Vec<f32>) -> Raster {
    Raster::new(width, height, data).unwrap()
}

// ============================================================================
// Degenerate rasters
// ============================================================================

#[test]
fn test_all_invalid_raster_yields_empty_set() {
    let input = raster(6, 5, create_all_nan_grid(6, 5));
    let detection = analyze_anomalies(input, 0.05).unwrap();

    assert!(detection.anomalies.is_empty());
    assert_eq!(detection.raster.shape(), (5, 6));
    assert!(detection.raster.data().iter().all(|v| v.is_nan()));
}

#[test]
fn test_single_valid_value() {
    let mut data = create_all_nan_grid(4, 4);
    data[5] = 31.0;
    let detection = analyze_anomalies(raster(4, 4, data), 0.05).unwrap();

    assert!(detection.anomalies.len() <= 1);
    assert!(detection.anomalies.iter().all(|i| i == 5));
}

#[test]
fn test_one_by_one_raster() {
    let detection = analyze_anomalies(raster(1, 1, vec![42.0]), 0.05).unwrap();
    assert!(detection.anomalies.len() <= 1);
}

#[test]
fn test_uniform_raster_has_no_anomalies() {
    let detection = analyze_anomalies(raster(8, 8, create_constant_grid(8, 8, 27.5)), 0.1).unwrap();
    assert!(detection.anomalies.is_empty());
}

// ============================================================================
// Hotspots
// ============================================================================

#[test]
fn test_single_hot_cell_is_flagged() {
    let data = create_hotspot_grid(10, 10, 20.0, 80.0, 3, 6);
    let detection = analyze_anomalies(raster(10, 10, data), 0.05).unwrap();

    assert!(detection.anomalies.contains(3 * 10 + 6));
    assert_eq!(detection.anomalies.len(), 1);
    assert_eq!(detection.anomalies.coordinates(&detection.raster), vec![(3, 6)]);
}

#[test]
fn test_plume_cells_are_flagged() {
    let (w, h) = (40, 40);
    let data = create_lst_grid_with_plume(w, h, 20, 12, 1, 30.0);
    let detection = analyze_anomalies(raster(w, h, data), 0.05).unwrap();

    for row in 19..=21 {
        for col in 11..=13 {
            assert!(
                detection.anomalies.contains(row * w + col),
                "plume cell ({}, {}) not flagged",
                row,
                col
            );
        }
    }
    // Roughly the contamination fraction of 1600 cells
    assert!(detection.anomalies.len() <= 100);
}

#[test]
fn test_flagged_indices_are_valid_samples() {
    let (w, h) = (30, 20);
    let base = create_lst_grid_with_plume(w, h, 5, 5, 2, 20.0);
    let data = create_grid_with_nans(w, h, &base, 7, 3);
    let input = raster(w, h, data);

    let detection = analyze_anomalies(input, 0.1).unwrap();
    assert!(!detection.anomalies.is_empty());
    for idx in detection.anomalies.iter() {
        let v = detection.raster.value_at(idx).unwrap();
        assert!(v.is_finite(), "index {} points at invalid sample", idx);
    }
}

#[test]
fn test_raster_is_returned_unchanged() {
    let data = create_lst_grid(12, 9);
    let input = raster(12, 9, data.clone());
    let detection = analyze_anomalies(input, 0.05).unwrap();
    assert_eq!(detection.raster.data(), data.as_slice());
}

// ============================================================================
// Determinism and configuration
// ============================================================================

#[test]
fn test_repeated_runs_are_identical() {
    let (w, h) = (64, 48);
    let data = create_lst_grid_with_plume(w, h, 30, 40, 2, 12.0);
    let detector = AnomalyDetector::new(DetectorConfig::default()).unwrap();

    let first = detector.flag(&raster(w, h, data.clone()));
    let second = detector.flag(&raster(w, h, data));
    assert_eq!(first, second);
}

#[test]
fn test_larger_contamination_flags_more() {
    let (w, h) = (32, 32);
    let data = create_lst_grid(w, h);
    let few = analyze_anomalies(raster(w, h, data.clone()), 0.02).unwrap();
    let many = analyze_anomalies(raster(w, h, data), 0.2).unwrap();
    assert!(many.anomalies.len() > few.anomalies.len());
}

#[test]
fn test_invalid_contamination_fails_fast() {
    let input = raster(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
    for bad in [0.0, 1.0, 2.0] {
        match analyze_anomalies(input.clone(), bad) {
            Err(LstError::InvalidParameter { param, .. }) => assert_eq!(param, "contamination"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }
}
