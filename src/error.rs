// src/error.rs
//! Error taxonomy shared by the web layer and the CLI.
//!
//! Each boundary (language model, query generation, scraping, profile source,
//! text extraction) owns a narrow error enum; `AppError` folds them into the
//! categories callers act on.

use thiserror::Error;

use crate::llm::LlmError;
use crate::profile::document::ExtractionError;
use crate::profile::source::ProfileSourceError;
use crate::query::GenerationError;
use crate::search::{ScrapeError, SearchError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    UpstreamAuth(String),

    #[error("{0}")]
    ModelOutput(String),

    #[error("{0}")]
    UpstreamTimeout(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RateLimited(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Input(_) => 400,
            Self::NotFound(_) => 404,
            Self::RateLimited(_) => 429,
            Self::UpstreamTimeout(_) => 504,
            Self::UpstreamAuth(_) | Self::ModelOutput(_) | Self::Upstream(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Input(_) => "INVALID_INPUT",
            Self::UpstreamAuth(_) => "UPSTREAM_AUTH_ERROR",
            Self::ModelOutput(_) => "MODEL_OUTPUT_ERROR",
            Self::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RateLimited(_) => "RATE_LIMITED",
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        let hints: &[&str] = match self {
            Self::Input(_) => &["Check the request fields and try again"],
            Self::UpstreamAuth(_) => &[
                "Verify the API keys in the server environment",
                "Contact system administrator",
            ],
            Self::ModelOutput(_) => &["Try rephrasing the search query", "Try again in a few moments"],
            Self::UpstreamTimeout(_) | Self::Upstream(_) => &["Try again in a few moments"],
            Self::NotFound(_) => &[
                "Check that the profile URL is correct",
                "Make sure the profile is public",
            ],
            Self::RateLimited(_) => &["Wait a minute before retrying"],
        };
        hints.iter().map(|s| s.to_string()).collect()
    }

    /// True for errors caused by configuration or credentials rather than the request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UpstreamAuth(_))
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredentials(_) | LlmError::Unauthorized { .. } => {
                Self::UpstreamAuth(err.to_string())
            }
            LlmError::Request(_) | LlmError::Status { .. } => Self::Upstream(err.to_string()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Model(inner) => inner.into(),
            other => Self::ModelOutput(other.to_string()),
        }
    }
}

impl From<ScrapeError> for AppError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::MissingCredentials(_) | ScrapeError::Unauthorized { .. } => {
                Self::UpstreamAuth(err.to_string())
            }
            ScrapeError::Timeout(_) => Self::UpstreamTimeout(err.to_string()),
            ScrapeError::Request(_) | ScrapeError::Status { .. } | ScrapeError::Decode(_) => {
                Self::Upstream(err.to_string())
            }
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Scrape(inner) => inner.into(),
            SearchError::Encode(_) => Self::Upstream(err.to_string()),
        }
    }
}

impl From<ProfileSourceError> for AppError {
    fn from(err: ProfileSourceError) -> Self {
        match err {
            ProfileSourceError::InvalidUrl(_) => Self::Input(err.to_string()),
            ProfileSourceError::NotFound => Self::NotFound(err.to_string()),
            ProfileSourceError::MissingCredentials(_) | ProfileSourceError::Unauthorized => {
                Self::UpstreamAuth(err.to_string())
            }
            ProfileSourceError::RateLimited => Self::RateLimited(err.to_string()),
            ProfileSourceError::Request(_) | ProfileSourceError::Status { .. } => {
                Self::Upstream(err.to_string())
            }
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::TooLarge { .. }
            | ExtractionError::UnsupportedType(_)
            | ExtractionError::EmptyText => Self::Input(err.to_string()),
            ExtractionError::NotConfigured => Self::UpstreamAuth(err.to_string()),
            ExtractionError::Request(_) | ExtractionError::Status { .. } => {
                Self::Upstream(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_mapping() {
        let err: AppError = GenerationError::EmptyResponse.into();
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.error_code(), "MODEL_OUTPUT_ERROR");

        let err: AppError = GenerationError::Model(LlmError::MissingCredentials("OPENAI_API_KEY")).into();
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "OPENAI_API_KEY not configured");
    }

    #[test]
    fn test_input_error_is_client_fault() {
        let err = AppError::input("Search query is required");
        assert_eq!(err.http_status(), 400);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_profile_source_mapping() {
        assert_eq!(AppError::from(ProfileSourceError::NotFound).http_status(), 404);
        assert_eq!(AppError::from(ProfileSourceError::RateLimited).http_status(), 429);
        assert!(AppError::from(ProfileSourceError::Unauthorized).is_fatal());
    }
}
