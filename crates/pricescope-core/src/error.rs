//! Error types for dashboard operations

use thiserror::Error;

/// Failure classes the controller distinguishes when deciding a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Any failed remote call
    NetworkOrServer,
    /// The search returned nothing usable
    NoMatch,
    /// The service returned overlapping or out-of-order points
    DataIntegrityAnomaly,
}

/// Dashboard specific errors
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The reply decoded but lacked a required field
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    /// The query matched no company
    #[error("No match for '{0}'")]
    NoMatch(String),

    /// Points violated the ordering contract
    #[error("Data integrity anomaly: {0}")]
    DataIntegrity(String),

    /// Service URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown timeframe name
    #[error("Unknown timeframe: {0}")]
    UnknownTimeframe(String),

    /// Not one of the forecast horizons
    #[error("Unknown horizon: {0} (expected 1D, 1W or 1M)")]
    UnknownHorizon(String),

    /// Empty or unusable model identifier
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl DashboardError {
    /// Classify this error for the controller's failure policy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoMatch(_) => ErrorKind::NoMatch,
            Self::DataIntegrity(_) => ErrorKind::DataIntegrityAnomaly,
            _ => ErrorKind::NetworkOrServer,
        }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::NoMatch("zzz".to_string());
        assert_eq!(err.to_string(), "No match for 'zzz'");

        let err = DashboardError::Api {
            status: 500,
            message: "model missing".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): model missing");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(DashboardError::NoMatch("x".into()).kind(), ErrorKind::NoMatch);
        assert_eq!(
            DashboardError::DataIntegrity("dup".into()).kind(),
            ErrorKind::DataIntegrityAnomaly
        );
        assert_eq!(
            DashboardError::MalformedReply("no history".into()).kind(),
            ErrorKind::NetworkOrServer
        );

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(DashboardError::from(json_err).kind(), ErrorKind::NetworkOrServer);
    }
}
