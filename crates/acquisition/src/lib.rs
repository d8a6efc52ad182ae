//! Acquisition of recent, cloud-filtered land surface temperature rasters.
//!
//! The imagery backend is reached through the [`SceneCatalog`] seam. Sources
//! are tried in preference order; the first one with at least one scene in
//! the recency window provides a median composite, which is downloaded as
//! `.npy` and converted to degrees Celsius.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod query;
pub mod source;

pub use catalog::{HttpSceneCatalog, SceneCatalog};
pub use config::{load_acquisition_config, AcquisitionConfig, GatewayConfig, QueryDefaults};
pub use error::AcquisitionError;
pub use fetch::{acquire_lst, select_source, AcquiredRaster, RasterFetcher, SourceSelection};
pub use query::SceneQuery;
pub use source::{LstSource, SourceDefinition, SourcePreference};
