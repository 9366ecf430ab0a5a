// src/profile/source.rs
//! LinkedIn profile lookup through the profile enrichment API.

use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use super::linkedin::LinkedInRecord;
use super::types::Profile;
use crate::core::config_manager::ProfileSourceConfig;

const PROFILE_ENDPOINT: &str = "/api/v2/profile";

#[derive(Error, Debug)]
pub enum ProfileSourceError {
    #[error("Invalid LinkedIn URL: {0}")]
    InvalidUrl(String),

    #[error("LinkedIn profile not found or is private")]
    NotFound,

    #[error("{0} not configured")]
    MissingCredentials(&'static str),

    #[error("Profile service rejected the API key")]
    Unauthorized,

    #[error("Profile service rate limit exceeded")]
    RateLimited,

    #[error("profile request failed: {0}")]
    Request(String),

    #[error("profile service returned error {status}: {body}")]
    Status { status: u16, body: String },
}

fn profile_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:https?://)?(?:[a-z]{2,3}\.)?(?:www\.)?linkedin\.com/in/([a-zA-Z0-9_-]+)/?(?:[?#].*)?$")
            .expect("profile url regex must compile")
    })
}

/// Canonical `https://www.linkedin.com/in/<handle>/` form of a profile URL.
pub fn normalize_linkedin_url(raw: &str) -> Result<String, ProfileSourceError> {
    let trimmed = raw.trim();
    let captures = profile_url_re()
        .captures(trimmed)
        .ok_or_else(|| ProfileSourceError::InvalidUrl(trimmed.to_string()))?;
    Ok(format!("https://www.linkedin.com/in/{}/", &captures[1]))
}

#[derive(Debug, Clone)]
pub struct FetchedProfile {
    pub record: LinkedInRecord,
    pub credit_cost: Option<u32>,
}

#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, profile_url: &str) -> Result<FetchedProfile, ProfileSourceError>;
}

pub struct EnrichLayerClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl EnrichLayerClient {
    pub fn new(config: &ProfileSourceConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ProfileSource for EnrichLayerClient {
    async fn fetch(&self, profile_url: &str) -> Result<FetchedProfile, ProfileSourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProfileSourceError::MissingCredentials("ENRICHLAYER_API_KEY"))?;

        info!("Fetching LinkedIn profile: {}", profile_url);

        let response = self
            .client
            .get(format!("{}{}", self.base_url, PROFILE_ENDPOINT))
            .bearer_auth(api_key)
            .query(&[
                ("profile_url", profile_url),
                ("skills", "include"),
                ("extra", "include"),
                ("use_cache", "if-present"),
                ("fallback_to_cache", "on-error"),
            ])
            .send()
            .await
            .map_err(|e| ProfileSourceError::Request(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(ProfileSourceError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("Profile service rejected credentials: {}", status);
                return Err(ProfileSourceError::Unauthorized);
            }
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Profile service rate limit hit");
                return Err(ProfileSourceError::RateLimited);
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                error!("Profile service error {}: {}", s, body);
                return Err(ProfileSourceError::Status { status: s.as_u16(), body });
            }
            _ => {}
        }

        let credit_cost = response
            .headers()
            .get("X-EnrichLayer-Credit-Cost")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());

        let record: LinkedInRecord = response
            .json()
            .await
            .map_err(|e| ProfileSourceError::Request(format!("invalid profile payload: {}", e)))?;

        if !record.has_identity() {
            warn!("Profile {} returned no name, treating as private", profile_url);
            return Err(ProfileSourceError::NotFound);
        }

        info!(
            "Fetched LinkedIn profile {} (credits used: {})",
            profile_url,
            credit_cost.map_or_else(|| "unknown".to_string(), |c| c.to_string())
        );

        Ok(FetchedProfile { record, credit_cost })
    }
}

/// Normalize the URL, fetch the record and convert it to the canonical profile.
pub async fn fetch_linkedin_profile(
    source: &dyn ProfileSource,
    raw_url: &str,
) -> Result<Profile, ProfileSourceError> {
    let profile_url = normalize_linkedin_url(raw_url)?;
    let fetched = source.fetch(&profile_url).await?;
    Ok(fetched.record.into_profile())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(Option<LinkedInRecord>);

    #[async_trait]
    impl ProfileSource for StaticSource {
        async fn fetch(&self, profile_url: &str) -> Result<FetchedProfile, ProfileSourceError> {
            assert_eq!(profile_url, "https://www.linkedin.com/in/ada/");
            self.0
                .clone()
                .map(|record| FetchedProfile { record, credit_cost: Some(1) })
                .ok_or(ProfileSourceError::NotFound)
        }
    }

    #[test]
    fn test_normalize_linkedin_url_variants() {
        let expected = "https://www.linkedin.com/in/jane-doe_42/";
        for raw in [
            "https://www.linkedin.com/in/jane-doe_42",
            "http://linkedin.com/in/jane-doe_42/",
            "linkedin.com/in/jane-doe_42",
            "  www.linkedin.com/in/jane-doe_42/?trk=share  ",
            "https://de.linkedin.com/in/jane-doe_42/",
        ] {
            assert_eq!(normalize_linkedin_url(raw).unwrap(), expected, "{}", raw);
        }
    }

    #[test]
    fn test_normalize_rejects_non_profile_urls() {
        for raw in [
            "https://www.linkedin.com/company/acme",
            "https://example.com/in/jane",
            "",
        ] {
            assert!(matches!(
                normalize_linkedin_url(raw),
                Err(ProfileSourceError::InvalidUrl(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_fetch_converts_record() {
        let record = LinkedInRecord {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            ..LinkedInRecord::default()
        };
        let profile = fetch_linkedin_profile(&StaticSource(Some(record)), "linkedin.com/in/ada")
            .await
            .unwrap();
        assert!(profile.sources.linkedin);
        assert_eq!(profile.personal_info.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_url_before_calling_source() {
        let result = fetch_linkedin_profile(&StaticSource(None), "https://example.com/ada").await;
        assert!(matches!(result, Err(ProfileSourceError::InvalidUrl(_))));
    }
}
