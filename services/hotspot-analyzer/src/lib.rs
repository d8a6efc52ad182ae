//! Thermal hotspot analysis around a single site.
//!
//! Pipeline: acquire (or load) an LST raster, flag anomalous cells, score
//! their severity, then write the overlay image, the interactive map and a
//! JSON report.

pub mod analysis;
pub mod output;
pub mod report;

pub use analysis::{analyze, Analysis};
pub use output::{write_outputs, OutputPaths};
pub use report::AnalysisReport;
