// src/search/apify.rs
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use super::{ScrapeError, Scraper};
use crate::core::config_manager::ScrapingConfig;

/// Synchronous actor runs against the Apify API.
pub struct ApifyClient {
    client: Client,
    api_token: Option<String>,
    base_url: String,
}

impl ApifyClient {
    pub fn new(config: &ScrapingConfig) -> anyhow::Result<Self> {
        // Per-platform ceilings are enforced by the executor.
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_token: config.api_token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn run_url(&self, actor_id: &str) -> String {
        format!(
            "{}/v2/acts/{}/run-sync-get-dataset-items",
            self.base_url,
            actor_id.replace('/', "~")
        )
    }
}

#[async_trait]
impl Scraper for ApifyClient {
    async fn run(&self, actor_id: &str, input: Value) -> Result<Vec<Value>, ScrapeError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or(ScrapeError::MissingCredentials("APIFY_API_TOKEN"))?;

        debug!("Starting actor run: {}", actor_id);

        let response = self
            .client
            .post(self.run_url(actor_id))
            .query(&[("token", token)])
            .json(&input)
            .send()
            .await
            .map_err(|e| ScrapeError::Request(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("Scraping service rejected token for {}: {}", actor_id, status);
                return Err(ScrapeError::Unauthorized {
                    status: status.as_u16(),
                });
            }
            StatusCode::REQUEST_TIMEOUT => return Err(ScrapeError::Timeout(0)),
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                error!("Actor {} failed with {}: {}", actor_id, s, body);
                return Err(ScrapeError::Status {
                    status: s.as_u16(),
                    body,
                });
            }
            _ => {}
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ScrapeError::Decode(e.to_string()))?;

        match payload {
            Value::Array(items) => Ok(items),
            _ => Err(ScrapeError::Decode(
                "expected an array of dataset items".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_url_escapes_actor_owner() {
        let client = ApifyClient::new(&ScrapingConfig {
            api_token: None,
            base_url: "https://api.apify.com/".to_string(),
        })
        .unwrap();
        assert_eq!(
            client.run_url("fantastic-jobs/advanced-linkedin-job-search-api"),
            "https://api.apify.com/v2/acts/fantastic-jobs~advanced-linkedin-job-search-api/run-sync-get-dataset-items"
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_fatal() {
        let client = ApifyClient::new(&ScrapingConfig {
            api_token: None,
            base_url: "http://127.0.0.1:9".to_string(),
        })
        .unwrap();
        let err = client.run("a/b", Value::Null).await.unwrap_err();
        assert!(matches!(err, ScrapeError::MissingCredentials("APIFY_API_TOKEN")));
        assert!(err.is_fatal());
    }
}
