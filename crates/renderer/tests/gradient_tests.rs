//! Tests for heat colormap rendering.

use renderer::gradient::{hot_color, render_grid, render_heat, upscale_nearest, Color};
use test_utils::generators::{create_grid_with_nans, create_lst_grid};

// ============================================================================
// Colormap tests
// ============================================================================

#[test]
fn test_hot_is_monotonic_in_brightness() {
    let mut previous = 0u32;
    for i in 0..=100 {
        let c = hot_color(i as f32 / 100.0);
        let brightness = c.r as u32 + c.g as u32 + c.b as u32;
        assert!(brightness >= previous, "brightness dropped at {}", i);
        previous = brightness;
    }
}

#[test]
fn test_hot_clamps_out_of_range() {
    assert_eq!(hot_color(-1.0), hot_color(0.0));
    assert_eq!(hot_color(2.0), hot_color(1.0));
    assert_eq!(hot_color(f32::NAN), hot_color(0.0));
}

#[test]
fn test_hot_midpoint_is_orange() {
    let c = hot_color(0.5);
    assert_eq!(c.r, 255);
    assert!(c.g > 50 && c.g < 150, "g = {}", c.g);
    assert_eq!(c.b, 0);
}

// ============================================================================
// Grid rendering tests
// ============================================================================

#[test]
fn test_render_grid_dimensions() {
    let data = create_lst_grid(12, 7);
    let pixels = render_heat(&data, 12, 7, 25.0, 40.0);
    assert_eq!(pixels.len(), 12 * 7 * 4);
}

#[test]
fn test_render_grid_min_max_colors() {
    let data = [0.0, 5.0, 10.0];
    let pixels = render_heat(&data, 3, 1, 0.0, 10.0);

    assert_eq!(&pixels[0..4], &[0, 0, 0, 255]);
    assert_eq!(&pixels[8..12], &[255, 255, 255, 255]);
}

#[test]
fn test_render_grid_nans_transparent() {
    let data = create_grid_with_nans(10, 10, &create_lst_grid(10, 10), 7, 0);
    let pixels = render_heat(&data, 10, 10, 25.0, 40.0);

    for (i, value) in data.iter().enumerate() {
        let alpha = pixels[i * 4 + 3];
        if value.is_nan() {
            assert_eq!(alpha, 0, "cell {} should be transparent", i);
        } else {
            assert_eq!(alpha, 255, "cell {} should be opaque", i);
        }
    }
}

#[test]
fn test_render_grid_flat_range_uses_low_end() {
    let pixels = render_grid(&[7.0; 4], 2, 2, 7.0, 7.0, |t| {
        Color::new((t * 255.0) as u8, 0, 0, 255)
    });
    assert!(pixels.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

// ============================================================================
// Upscaling tests
// ============================================================================

#[test]
fn test_upscale_nearest_replicates_blocks() {
    // 2x1: red, blue
    let pixels = [255, 0, 0, 255, 0, 0, 255, 255];
    let (out, w, h) = upscale_nearest(&pixels, 2, 1, 3);

    assert_eq!((w, h), (6, 3));
    for y in 0..3 {
        for x in 0..6 {
            let p = &out[(y * 6 + x) * 4..(y * 6 + x) * 4 + 4];
            let expected: &[u8] = if x < 3 { &pixels[0..4] } else { &pixels[4..8] };
            assert_eq!(p, expected, "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn test_upscale_factor_one_is_identity() {
    let pixels = vec![1, 2, 3, 4];
    let (out, w, h) = upscale_nearest(&pixels, 1, 1, 1);
    assert_eq!(out, pixels);
    assert_eq!((w, h), (1, 1));
}
