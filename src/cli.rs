// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::{AppState, ConfigManager};
use crate::orchestrator::AggregatedSearchRequest;
use crate::platform::Platform;
use crate::profile::{merge_profiles, Profile};
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Search job platforms from a free-text query and an optional profile")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Search tuning file with `local` and `production` sections
    #[arg(long, global = true, default_value = "config.yaml")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,
    /// Search several platforms and print the merged results
    Search {
        query: String,
        /// Platforms to search; omit to let the language model choose
        #[arg(long = "platform")]
        platforms: Vec<Platform>,
        /// Canonical profile JSON file
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Print the generated search parameters for one platform
    Query {
        platform: Platform,
        query: String,
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Print which platforms the language model would search
    Select {
        query: String,
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Merge two canonical profile JSON files, the first one winning
    MergeProfiles { primary: PathBuf, secondary: PathBuf },
}

async fn read_profile(path: &Path) -> Result<Profile> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn optional_profile(path: Option<&Path>) -> Result<Option<Profile>> {
    match path {
        Some(path) => Ok(Some(read_profile(path).await?)),
        None => Ok(None),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to encode output")?
    );
    Ok(())
}

fn load_state(config_path: &Path) -> Result<AppState> {
    AppState::from_config(&ConfigManager::load_from(config_path)?)
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config_path = cli.config;

    match cli.command {
        Command::Serve => start_web_server(ConfigManager::load_from(&config_path)?).await,

        Command::Search {
            query,
            platforms,
            profile,
        } => {
            let state = load_state(&config_path)?;
            let profile = optional_profile(profile.as_deref()).await?;
            let aggregated = state
                .search
                .search(AggregatedSearchRequest {
                    query,
                    profile,
                    sources: (!platforms.is_empty()).then_some(platforms),
                })
                .await?;
            info!(
                "Search #{} returned {} results",
                aggregated.generation, aggregated.total_results
            );
            print_json(&aggregated)
        }

        Command::Query {
            platform,
            query,
            profile,
        } => {
            let state = load_state(&config_path)?;
            let profile = optional_profile(profile.as_deref()).await?;
            let generated = state
                .search
                .generate_query(platform, &query, profile.as_ref())
                .await?;
            print_json(&generated)
        }

        Command::Select { query, profile } => {
            let state = load_state(&config_path)?;
            let profile = optional_profile(profile.as_deref()).await?;
            let selection = state
                .search
                .select_sources(&query, profile.as_ref())
                .await?;
            print_json(&selection)
        }

        Command::MergeProfiles { primary, secondary } => {
            let merged = merge_profiles(read_profile(&primary).await?, read_profile(&secondary).await?);
            print_json(&merged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_platforms() {
        let cli = Cli::try_parse_from([
            "jobscout",
            "search",
            "remote React developer",
            "--platform",
            "linkedin",
            "--platform",
            "Freelancer",
        ])
        .unwrap();
        match cli.command {
            Command::Search {
                query, platforms, ..
            } => {
                assert_eq!(query, "remote React developer");
                assert_eq!(platforms, vec![Platform::LinkedIn, Platform::Freelance]);
            }
            _ => panic!("expected search command"),
        }
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
    }

    #[test]
    fn test_unknown_platform_rejected() {
        assert!(Cli::try_parse_from(["jobscout", "query", "monster", "nurse"]).is_err());
    }
}
