// src/core/config_manager.rs
//! Configuration resolved once at startup and injected everywhere else.
//!
//! Credentials and endpoints come from the environment. Search tuning comes
//! from an optional `config.yaml` holding a `local` and a `production`
//! section; every field in it is optional and falls back to the defaults below.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::platform::Platform;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com";
const DEFAULT_ENRICHLAYER_BASE_URL: &str = "https://enrichlayer.com";
const DEFAULT_PORT: u16 = 8000;
const MAX_LINKEDIN_QUERIES: usize = 4;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub server: ServerSettings,
    pub llm: LlmConfig,
    pub scraping: ScrapingConfig,
    pub profile_source: ProfileSourceConfig,
    pub extraction: ExtractionConfig,
    pub search: SearchSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct ScrapingConfig {
    pub api_token: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ProfileSourceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub service_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlatformTimeouts {
    pub linkedin: u64,
    pub upwork: u64,
    pub indeed: u64,
    pub behance: u64,
    pub freelance: u64,
}

impl Default for PlatformTimeouts {
    fn default() -> Self {
        Self {
            linkedin: 180,
            upwork: 120,
            indeed: 120,
            behance: 70,
            freelance: 120,
        }
    }
}

impl PlatformTimeouts {
    pub fn for_platform(&self, platform: Platform) -> Duration {
        let secs = match platform {
            Platform::LinkedIn => self.linkedin,
            Platform::Upwork => self.upwork,
            Platform::Indeed => self.indeed,
            Platform::Behance => self.behance,
            Platform::Freelance => self.freelance,
        };
        Duration::from_secs(secs)
    }
}

/// Scraping actor identifiers per platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActorIds {
    pub linkedin: String,
    pub upwork: String,
    pub indeed: String,
    pub behance: String,
    pub freelance: String,
}

impl Default for ActorIds {
    fn default() -> Self {
        Self {
            linkedin: "fantastic-jobs/advanced-linkedin-job-search-api".to_string(),
            upwork: "fasty_dev/upwork-job-scraper".to_string(),
            indeed: "cheapget/indeed-job-search".to_string(),
            behance: "scrapestorm/behance-jobs-search-scraper-fast-and-cheap".to_string(),
            freelance: "getdataforme/freelancer-jobs-scraper".to_string(),
        }
    }
}

impl ActorIds {
    pub fn for_platform(&self, platform: Platform) -> &str {
        match platform {
            Platform::LinkedIn => &self.linkedin,
            Platform::Upwork => &self.upwork,
            Platform::Indeed => &self.indeed,
            Platform::Behance => &self.behance,
            Platform::Freelance => &self.freelance,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub timeouts: PlatformTimeouts,
    pub actors: ActorIds,
    pub linkedin_query_count: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeouts: PlatformTimeouts::default(),
            actors: ActorIds::default(),
            linkedin_query_count: 1,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvironmentSection {
    port: Option<u16>,
    llm_timeout_seconds: Option<u64>,
    linkedin_query_count: Option<usize>,
    timeouts: Option<PlatformTimeouts>,
    actors: Option<ActorIds>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: EnvironmentSection,
    production: EnvironmentSection,
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ConfigManager {
    /// Load configuration from the environment and `config.yaml` when present.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.yaml"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let section = Self::load_section(config_path, &environment)?;

        let port = match env_opt("ROCKET_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
            None => section.port.unwrap_or(DEFAULT_PORT),
        };

        let llm = LlmConfig {
            api_key: env_opt("OPENAI_API_KEY"),
            base_url: env_opt("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: env_opt("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            timeout_seconds: section.llm_timeout_seconds.unwrap_or(60),
        };

        let scraping = ScrapingConfig {
            api_token: env_opt("APIFY_API_TOKEN"),
            base_url: env_opt("APIFY_BASE_URL").unwrap_or_else(|| DEFAULT_APIFY_BASE_URL.to_string()),
        };

        let profile_source = ProfileSourceConfig {
            api_key: env_opt("ENRICHLAYER_API_KEY"),
            base_url: env_opt("ENRICHLAYER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ENRICHLAYER_BASE_URL.to_string()),
        };

        let extraction = ExtractionConfig {
            service_url: env_opt("TEXT_EXTRACTION_URL"),
        };

        let search = SearchSettings {
            timeouts: section.timeouts.unwrap_or_default(),
            actors: section.actors.unwrap_or_default(),
            linkedin_query_count: section
                .linkedin_query_count
                .unwrap_or(1)
                .clamp(1, MAX_LINKEDIN_QUERIES),
        };

        let config = Self {
            environment,
            server: ServerSettings { port },
            llm,
            scraping,
            profile_source,
            extraction,
            search,
        };
        config.warn_missing_credentials();
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("JOBSCOUT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_section(config_path: &Path, environment: &str) -> Result<EnvironmentSection> {
        if !config_path.exists() {
            info!(
                "No {} found, using built-in search settings",
                config_path.display()
            );
            return Ok(EnvironmentSection::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    fn warn_missing_credentials(&self) {
        let checks = [
            ("OPENAI_API_KEY", self.llm.api_key.is_some()),
            ("APIFY_API_TOKEN", self.scraping.api_token.is_some()),
            ("ENRICHLAYER_API_KEY", self.profile_source.api_key.is_some()),
        ];
        for (name, present) in checks {
            if !present {
                warn!("{} is not set; requests needing it will fail", name);
            }
        }
        if self.extraction.service_url.is_none() {
            warn!("TEXT_EXTRACTION_URL is not set; only plain-text CVs can be parsed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_per_platform() {
        let timeouts = PlatformTimeouts::default();
        assert_eq!(timeouts.for_platform(Platform::Behance), Duration::from_secs(70));
        assert_eq!(timeouts.for_platform(Platform::LinkedIn), Duration::from_secs(180));
    }

    #[test]
    fn test_parse_partial_section() {
        let yaml = r#"
local:
  linkedin_query_count: 3
  timeouts:
    behance: 10
production:
  port: 9000
"#;
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.local.linkedin_query_count, Some(3));
        let timeouts = file.local.timeouts.unwrap();
        assert_eq!(timeouts.behance, 10);
        assert_eq!(timeouts.linkedin, 180);
        assert_eq!(file.production.port, Some(9000));
        assert!(file.production.actors.is_none());
    }

    #[test]
    fn test_actor_ids() {
        let actors = ActorIds::default();
        assert_eq!(actors.for_platform(Platform::Indeed), "cheapget/indeed-job-search");
    }
}
