//! Error types for quakeview.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur while fetching and decoding the event feed.
#[derive(Error, Debug)]
pub enum QuakeviewError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Feed returned an error status
    #[error("feed error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response is not a GeoJSON feature collection
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A single feature is structurally broken
    #[error("Invalid event data: {0}")]
    Validation(String),
}

impl QuakeviewError {
    /// Whether this error means the whole feed could not be obtained.
    ///
    /// The loader swallows these; `Validation` only ever drops one feature.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_classification() {
        let api = QuakeviewError::Api {
            status: 503,
            message: "busy".into(),
        };
        assert!(api.is_fetch_failure());
        assert!(QuakeviewError::InvalidResponse("x".into()).is_fetch_failure());
        assert!(!QuakeviewError::Validation("empty id".into()).is_fetch_failure());
    }
}
