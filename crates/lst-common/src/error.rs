//! Error types for thermal hotspot analysis.

use thiserror::Error;

/// Result type alias using LstError.
pub type LstResult<T> = Result<T, LstError>;

/// Primary error type shared by the analysis crates.
#[derive(Debug, Error)]
pub enum LstError {
    // === Caller Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid raster shape: {0}")]
    InvalidShape(String),

    // === Data Errors ===
    #[error("Failed to read data: {0}")]
    DataReadError(String),

    #[error("Raster acquisition failed: {0}")]
    AcquisitionError(String),

    #[error("No usable cloud-free scenes in the last {window_days} days. Tried: {tried}")]
    NoUsableScenes { window_days: u32, tried: String },

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Request timeout")]
    Timeout,
}

impl LstError {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        LstError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller rather than by data or infrastructure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            LstError::InvalidParameter { .. } | LstError::InvalidShape(_)
        )
    }

    /// Process exit code used by command line front ends.
    pub fn exit_code(&self) -> i32 {
        match self {
            LstError::InvalidParameter { .. } | LstError::InvalidShape(_) => 2,
            LstError::NoUsableScenes { .. } => 3,
            LstError::Timeout => 4,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for LstError {
    fn from(err: std::io::Error) -> Self {
        LstError::DataReadError(err.to_string())
    }
}

impl From<serde_json::Error> for LstError {
    fn from(err: serde_json::Error) -> Self {
        LstError::InternalError(format!("JSON error: {}", err))
    }
}
