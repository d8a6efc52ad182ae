//! Source selection with fallback, and raster download.

use std::time::Duration;

use lst_common::Raster;
use npy_parser::parse_npy;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::catalog::SceneCatalog;
use crate::config::AcquisitionConfig;
use crate::error::AcquisitionError;
use crate::query::SceneQuery;
use crate::source::{LstSource, SourceDefinition, SourcePreference};

pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// The source chosen for a query and where to download its composite.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSelection {
    pub source: SourceDefinition,
    pub scene_count: u64,
    pub download_url: String,
}

/// A calibrated raster and the source it came from.
#[derive(Debug, Clone)]
pub struct AcquiredRaster {
    pub source: LstSource,
    pub raster: Raster,
    pub download_url: String,
}

/// Pick the first source, in preference order, with at least one scene.
///
/// A failing count is logged and treated as zero scenes.
pub async fn select_source(
    catalog: &dyn SceneCatalog,
    config: &AcquisitionConfig,
    preference: SourcePreference,
    query: &SceneQuery,
) -> Result<SourceSelection, AcquisitionError> {
    let mut tried = Vec::new();
    let order = preference.order();

    for (i, &kind) in order.iter().enumerate() {
        let source = config
            .source(kind)
            .ok_or(AcquisitionError::UnknownSource(kind))?;

        let count = match catalog.scene_count(source, query).await {
            Ok(count) => count,
            Err(e) => {
                warn!(source = %kind, error = %e, "Scene count failed, treating as empty");
                0
            }
        };
        debug!(source = %kind, count, "Scene count");
        tried.push((kind, count));

        if count > 0 {
            let download_url = catalog.median_download_url(source, query).await?;
            info!(source = %kind, scenes = count, "Selected imagery source");
            return Ok(SourceSelection {
                source: source.clone(),
                scene_count: count,
                download_url,
            });
        }

        if let Some(next) = order.get(i + 1) {
            warn!(
                source = %kind,
                next = %next,
                window_days = query.window_days,
                "No usable scenes, trying next source"
            );
        }
    }

    Err(AcquisitionError::NoUsableScenes {
        window_days: query.window_days,
        tried,
    })
}

/// Downloads `.npy` composites and converts them to degrees Celsius.
pub struct RasterFetcher {
    client: Client,
}

impl RasterFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AcquisitionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AcquisitionError::Catalog(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Download `url` and calibrate it with `source`'s gain and offset.
    #[instrument(skip(self, source), fields(source = %source.kind))]
    pub async fn fetch(
        &self,
        url: &str,
        source: &SourceDefinition,
    ) -> Result<Raster, AcquisitionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AcquisitionError::from_request)?;

        if !response.status().is_success() {
            return Err(AcquisitionError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(AcquisitionError::from_request)?;
        debug!(size = bytes.len(), "Downloaded raster");

        let raster = parse_npy(&bytes)?;
        Ok(calibrate(raster, source))
    }
}

/// Apply a source's gain/offset to every valid sample.
pub fn calibrate(raster: Raster, source: &SourceDefinition) -> Raster {
    raster.map_valid(|raw| source.calibrate(raw))
}

/// Select a source for `query`, download its composite and calibrate it.
pub async fn acquire_lst(
    catalog: &dyn SceneCatalog,
    fetcher: &RasterFetcher,
    config: &AcquisitionConfig,
    preference: SourcePreference,
    query: &SceneQuery,
) -> Result<AcquiredRaster, AcquisitionError> {
    let selection = select_source(catalog, config, preference, query).await?;
    let raster = fetcher
        .fetch(&selection.download_url, &selection.source)
        .await?;

    info!(
        source = %selection.source.kind,
        rows = raster.height(),
        cols = raster.width(),
        "Acquired LST raster"
    );

    Ok(AcquiredRaster {
        source: selection.source.kind,
        raster,
        download_url: selection.download_url,
    })
}
