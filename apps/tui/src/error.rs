use thiserror::Error;

/// Failure of a backend fetch, surfaced to the user as a retryable state.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Member not found: {id}")]
    NotFound { id: String },

    #[error("HTTP error! status: {status} ({message})")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No family tree data available")]
    EmptyData,
}

impl FetchError {
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("API base URL must not be empty")]
    EmptyBaseUrl,

    #[error("tree id must not be empty")]
    EmptyTreeId,

    #[error("zoom settings must be finite numbers (min {min}, max {max}, step {step})")]
    NonFiniteZoom { min: f64, max: f64, step: f64 },

    #[error("zoom bounds must be positive (min {min}, max {max})")]
    NonPositiveZoom { min: f64, max: f64 },

    #[error("minimum zoom {min} exceeds maximum zoom {max}")]
    InvertedZoom { min: f64, max: f64 },

    #[error("zoom step must be positive, got {0}")]
    NonPositiveStep(f64),
}
