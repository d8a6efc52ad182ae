//! Scene catalog seam and its HTTP gateway implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::AcquisitionError;
use crate::query::SceneQuery;
use crate::source::SourceDefinition;

/// Imagery backend able to count matching scenes and export a composite.
#[async_trait]
pub trait SceneCatalog: Send + Sync {
    /// Number of scenes of `source` inside the query window and under the cloud limit.
    async fn scene_count(
        &self,
        source: &SourceDefinition,
        query: &SceneQuery,
    ) -> Result<u64, AcquisitionError>;

    /// URL of a `.npy` export of the median composite over the query region.
    async fn median_download_url(
        &self,
        source: &SourceDefinition,
        query: &SceneQuery,
    ) -> Result<String, AcquisitionError>;
}

#[derive(Debug, Deserialize)]
struct SceneCountResponse {
    count: u64,
}

/// Catalog backed by an imagery gateway speaking plain HTTP.
///
/// - `GET {base}/scenes?...` answers `{"count": n}`
/// - `{base}/median.npy?...` serves the composite
pub struct HttpSceneCatalog {
    client: Client,
    base_url: String,
}

impl HttpSceneCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AcquisitionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AcquisitionError::Catalog(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(
        &self,
        path: &str,
        source: &SourceDefinition,
        query: &SceneQuery,
    ) -> Result<Url, AcquisitionError> {
        let mut params = vec![
            ("source", source.kind.to_string()),
            ("collection", source.collection.clone()),
            ("bands", source.bands.join(",")),
            ("cloud_property", source.cloud_property.clone()),
            ("scale", source.scale_m.to_string()),
        ];
        params.extend(query.query_pairs());

        Url::parse_with_params(&format!("{}/{}", self.base_url, path), &params)
            .map_err(|e| AcquisitionError::Catalog(format!("Invalid gateway URL: {}", e)))
    }
}

#[async_trait]
impl SceneCatalog for HttpSceneCatalog {
    #[instrument(skip(self, source, query), fields(source = %source.kind))]
    async fn scene_count(
        &self,
        source: &SourceDefinition,
        query: &SceneQuery,
    ) -> Result<u64, AcquisitionError> {
        let url = self.endpoint("scenes", source, query)?;
        debug!(url = %url, "Counting scenes");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(AcquisitionError::from_request)?;

        if !response.status().is_success() {
            return Err(AcquisitionError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: SceneCountResponse = response
            .json()
            .await
            .map_err(|e| AcquisitionError::Catalog(format!("Bad scene count response: {}", e)))?;

        Ok(body.count)
    }

    async fn median_download_url(
        &self,
        source: &SourceDefinition,
        query: &SceneQuery,
    ) -> Result<String, AcquisitionError> {
        Ok(self.endpoint("median.npy", source, query)?.to_string())
    }
}
