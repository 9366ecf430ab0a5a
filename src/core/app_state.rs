// src/core/app_state.rs
//! Capability wiring shared by the HTTP server and the CLI.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use super::config_manager::ConfigManager;
use super::service_client::ServiceClient;
use crate::llm::{LanguageModel, OpenAiClient};
use crate::orchestrator::JobSearchService;
use crate::profile::{EnrichLayerClient, ProfileSource, TextExtractor};
use crate::search::{ApifyClient, Scraper};

pub struct AppState {
    pub search: Arc<JobSearchService>,
    pub profile_source: Arc<dyn ProfileSource>,
    pub extractor: Option<Arc<dyn TextExtractor>>,
}

impl AppState {
    pub fn from_config(config: &ConfigManager) -> Result<Self> {
        let llm: Arc<dyn LanguageModel> = Arc::new(OpenAiClient::new(&config.llm)?);
        let scraper: Arc<dyn Scraper> = Arc::new(ApifyClient::new(&config.scraping)?);
        let profile_source: Arc<dyn ProfileSource> =
            Arc::new(EnrichLayerClient::new(&config.profile_source)?);

        let extractor = match &config.extraction.service_url {
            Some(url) => {
                info!("Text extraction service: {}", url);
                Some(Arc::new(ServiceClient::new(url.clone())?) as Arc<dyn TextExtractor>)
            }
            None => None,
        };

        info!(
            "Language model: {} at {}",
            config.llm.model, config.llm.base_url
        );

        Ok(Self {
            search: Arc::new(JobSearchService::new(llm, scraper, config.search.clone())),
            profile_source,
            extractor,
        })
    }
}
