// src/search/mod.rs
//! Running validated parameters against the external scraping service.

pub mod apify;
pub mod executor;
pub mod relax;

pub use apify::ApifyClient;
pub use executor::{search_with_retry, SearchError, SearchOutcome};
pub use relax::{RelaxState, Relaxable, RelaxationPlan};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("{0} not configured")]
    MissingCredentials(&'static str),

    #[error("scraping service rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    #[error("scraping run timed out after {0}s")]
    Timeout(u64),

    #[error("scraping request failed: {0}")]
    Request(String),

    #[error("scraping service returned error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("scraping service returned an unexpected payload: {0}")]
    Decode(String),
}

impl ScrapeError {
    /// Credential problems end the whole search instead of degrading to no results.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScrapeError::MissingCredentials(_) | ScrapeError::Unauthorized { .. }
        )
    }
}

/// Runs one scraping actor synchronously and returns its dataset items.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn run(&self, actor_id: &str, input: Value) -> Result<Vec<Value>, ScrapeError>;
}
