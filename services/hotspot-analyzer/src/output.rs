//! Writes the overlay image, map page and report for one analysis.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lst_common::GeoPoint;
use renderer::{png_data_uri, render_overlay, MapDocument, OverlayStyle};
use tracing::info;

use crate::analysis::Analysis;
use crate::report::AnalysisReport;

pub const OVERLAY_FILE: &str = "overlay.png";
pub const MAP_FILE: &str = "map.html";
pub const REPORT_FILE: &str = "report.json";

/// Files produced by [`write_outputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub overlay: PathBuf,
    pub map: PathBuf,
    pub report: PathBuf,
}

/// Render and write all artefacts into `dir`, creating it if needed.
pub fn write_outputs(
    dir: &Path,
    point: GeoPoint,
    analysis: &Analysis,
    style: &OverlayStyle,
) -> Result<(AnalysisReport, OutputPaths)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    let paths = OutputPaths {
        overlay: dir.join(OVERLAY_FILE),
        map: dir.join(MAP_FILE),
        report: dir.join(REPORT_FILE),
    };

    let overlay = render_overlay(analysis.raster(), &analysis.detection.anomalies, style)?;
    let png = overlay.to_png()?;
    fs::write(&paths.overlay, &png)
        .with_context(|| format!("Failed to write {:?}", paths.overlay))?;

    let html = MapDocument::new(point)
        .with_overlay(png_data_uri(&png))
        .to_html();
    fs::write(&paths.map, html).with_context(|| format!("Failed to write {:?}", paths.map))?;

    let report = AnalysisReport::new(point, analysis);
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    fs::write(&paths.report, json)
        .with_context(|| format!("Failed to write {:?}", paths.report))?;

    info!(
        dir = %dir.display(),
        overlay_bytes = png.len(),
        width = overlay.width(),
        height = overlay.height(),
        "Wrote analysis outputs"
    );

    Ok((report, paths))
}
