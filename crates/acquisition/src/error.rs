//! Acquisition errors.

use lst_common::LstError;
use npy_parser::NpyError;
use thiserror::Error;

use crate::source::LstSource;

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Scene catalog request failed: {0}")]
    Catalog(String),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Downloaded raster could not be decoded: {0}")]
    Decode(#[from] NpyError),

    #[error("Source {0} is not configured")]
    UnknownSource(LstSource),

    #[error("No usable cloud-free scenes in the last {window_days} days. Tried: {}", format_tried(.tried))]
    NoUsableScenes {
        window_days: u32,
        tried: Vec<(LstSource, u64)>,
    },

    #[error("Request timed out")]
    Timeout,
}

impl AcquisitionError {
    /// Map a reqwest error, keeping timeouts distinguishable.
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AcquisitionError::Timeout
        } else {
            AcquisitionError::Http(err)
        }
    }
}

fn format_tried(tried: &[(LstSource, u64)]) -> String {
    if tried.is_empty() {
        return "none".to_string();
    }
    tried
        .iter()
        .map(|(source, count)| format!("{} ({} scenes)", source, count))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<AcquisitionError> for LstError {
    fn from(err: AcquisitionError) -> Self {
        match err {
            AcquisitionError::NoUsableScenes { window_days, tried } => LstError::NoUsableScenes {
                window_days,
                tried: format_tried(&tried),
            },
            AcquisitionError::Timeout => LstError::Timeout,
            AcquisitionError::Decode(e) => e.into(),
            other => LstError::AcquisitionError(other.to_string()),
        }
    }
}
