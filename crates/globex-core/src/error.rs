// crates/globex-core/src/error.rs

//! Error types shared by every stage of the pipeline.
//!
//! The three per-candidate kinds ([`GlobexError::SourceUnreachable`],
//! [`GlobexError::SourceRejected`], [`GlobexError::MalformedResponse`]) are
//! caught inside the fetcher and only logged. What escapes to callers is
//! exhaustion ([`GlobexError::DataUnavailable`], [`GlobexError::LookupNotFound`])
//! or a geolocation/storage problem.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlobexError>;

#[derive(Debug, Error)]
pub enum GlobexError {
    #[error("source unreachable: {url}: {reason}")]
    SourceUnreachable { url: String, reason: String },

    #[error("source rejected request: {url} answered HTTP {status}")]
    SourceRejected { url: String, status: u16 },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("country data unavailable: all {attempts} sources failed and no fallback dataset is configured")]
    DataUnavailable { attempts: usize },

    #[error("no country found for: {0}")]
    LookupNotFound(String),

    #[error("location access denied")]
    GeolocationDenied,

    #[error("location unavailable: {0}")]
    GeolocationUnavailable(String),

    #[error("location request timed out")]
    GeolocationTimeout,

    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GlobexError {
    /// `true` for failures that only disqualify a single candidate source.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceUnreachable { .. } | Self::SourceRejected { .. } | Self::MalformedResponse { .. }
        )
    }

    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::GeolocationDenied => "Please allow location access".to_string(),
            Self::GeolocationUnavailable(_) => "Location unavailable".to_string(),
            Self::GeolocationTimeout => "Location request timed out".to_string(),
            Self::DataUnavailable { .. } => {
                "Failed to load countries. Please check your internet connection.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geolocation_kinds_have_distinct_messages() {
        let msgs = [
            GlobexError::GeolocationDenied.user_message(),
            GlobexError::GeolocationUnavailable("no fix".into()).user_message(),
            GlobexError::GeolocationTimeout.user_message(),
        ];
        assert_ne!(msgs[0], msgs[1]);
        assert_ne!(msgs[1], msgs[2]);
        assert_ne!(msgs[0], msgs[2]);
    }

    #[test]
    fn only_candidate_errors_are_source_failures() {
        let rejected = GlobexError::SourceRejected {
            url: "http://x".into(),
            status: 500,
        };
        assert!(rejected.is_source_failure());
        assert!(!GlobexError::DataUnavailable { attempts: 3 }.is_source_failure());
        assert!(!GlobexError::LookupNotFound("atlantis".into()).is_source_failure());
    }
}
