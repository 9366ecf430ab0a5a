// src/orchestrator.rs
//! Search orchestration: per-platform pipelines (generate, search, transform)
//! and the aggregated fan-out across platforms.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::core::config_manager::SearchSettings;
use crate::error::{AppError, AppResult};
use crate::llm::LanguageModel;
use crate::platform::Platform;
use crate::profile::{summarize_profile, Profile, ProfileSummary};
use crate::query::{generate_query, GenerationOptions, PlatformQuery, QueryInput};
use crate::results::{transform_results, DisplayRecord};
use crate::search::{search_with_retry, SearchOutcome, Scraper};
use crate::sources::{select_sources, select_sources_or_default, SourceSelection};

/// Result of one platform pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSearch {
    pub platform: Platform,
    pub search_query: PlatformQuery,
    pub results: Vec<DisplayRecord>,
    pub total_results: usize,
    pub attempts: usize,
    pub removed_fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlatformStatus {
    Pending,
    Ok { count: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformReport {
    pub platform: Platform,
    #[serde(flatten)]
    pub status: PlatformStatus,
}

/// Latest aggregated search as it fills in.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBoard {
    pub generation: u64,
    pub query: String,
    pub results: Vec<DisplayRecord>,
    pub platforms: Vec<PlatformReport>,
    pub complete: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResultBoard {
    fn start(generation: u64, query: &str, platforms: &[Platform]) -> Self {
        Self {
            generation,
            query: query.to_string(),
            results: Vec::new(),
            platforms: platforms
                .iter()
                .map(|&platform| PlatformReport {
                    platform,
                    status: PlatformStatus::Pending,
                })
                .collect(),
            complete: false,
            started_at: Some(Utc::now()),
            updated_at: None,
        }
    }

    fn record(&mut self, platform: Platform, status: PlatformStatus, results: Vec<DisplayRecord>) {
        if let Some(report) = self.platforms.iter_mut().find(|r| r.platform == platform) {
            report.status = status;
        }
        self.results.extend(results);
        self.updated_at = Some(Utc::now());
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregatedSearchRequest {
    pub query: String,
    pub profile: Option<Profile>,
    /// Explicit platforms; `None` lets the language model choose.
    pub sources: Option<Vec<Platform>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResults {
    pub generation: u64,
    pub results: Vec<DisplayRecord>,
    pub total_results: usize,
    pub platforms: Vec<PlatformReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// A newer search started before this one finished.
    pub superseded: bool,
}

/// Cheap-to-clone handle that runs a single platform end to end.
#[derive(Clone)]
struct Pipeline {
    llm: Arc<dyn LanguageModel>,
    scraper: Arc<dyn Scraper>,
    settings: Arc<SearchSettings>,
}

impl Pipeline {
    fn options(&self) -> GenerationOptions {
        GenerationOptions {
            linkedin_query_count: self.settings.linkedin_query_count,
        }
    }

    async fn generate(
        &self,
        platform: Platform,
        query: &str,
        summary: Option<&ProfileSummary>,
    ) -> AppResult<PlatformQuery> {
        let input = QueryInput::new(query, summary);
        Ok(generate_query(self.llm.as_ref(), platform, input, self.options()).await?)
    }

    async fn execute(&self, generated: &PlatformQuery) -> AppResult<SearchOutcome> {
        let platform = generated.platform();
        let scraper = self.scraper.as_ref();
        let actor = self.settings.actors.for_platform(platform);
        let ceiling = self.settings.timeouts.for_platform(platform);

        let outcome = match generated {
            PlatformQuery::LinkedIn(queries) => {
                let primary = queries
                    .first()
                    .ok_or_else(|| AppError::ModelOutput("No LinkedIn queries generated".into()))?;
                search_with_retry(scraper, platform, actor, &primary.params, ceiling).await?
            }
            PlatformQuery::Upwork(queries) => {
                let primary = queries
                    .first()
                    .ok_or_else(|| AppError::ModelOutput("No Upwork queries generated".into()))?;
                search_with_retry(scraper, platform, actor, &primary.params, ceiling).await?
            }
            PlatformQuery::Indeed(q) => {
                search_with_retry(scraper, platform, actor, &q.params, ceiling).await?
            }
            PlatformQuery::Behance(q) => {
                search_with_retry(scraper, platform, actor, &q.params, ceiling).await?
            }
            PlatformQuery::Freelance(q) => {
                search_with_retry(scraper, platform, actor, &q.params, ceiling).await?
            }
        };
        Ok(outcome)
    }

    async fn run(
        &self,
        platform: Platform,
        query: &str,
        summary: Option<&ProfileSummary>,
    ) -> AppResult<PlatformSearch> {
        let started = Instant::now();
        let search_query = self.generate(platform, query, summary).await?;
        let outcome = self.execute(&search_query).await?;
        let raw_count = outcome.items.len();
        let results = transform_results(platform, outcome.items);

        info!(
            "[{}] pipeline finished: {} raw, {} displayed, {}ms",
            platform,
            raw_count,
            results.len(),
            started.elapsed().as_millis()
        );

        Ok(PlatformSearch {
            platform,
            search_query,
            total_results: results.len(),
            results,
            attempts: outcome.attempts,
            removed_fields: outcome.removed_fields,
            degraded: outcome.degraded,
        })
    }
}

fn require_query(query: &str) -> AppResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::input("Search query is required"));
    }
    Ok(trimmed)
}

pub struct JobSearchService {
    pipeline: Pipeline,
    generation: AtomicU64,
    board: RwLock<ResultBoard>,
}

impl JobSearchService {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        scraper: Arc<dyn Scraper>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            pipeline: Pipeline {
                llm,
                scraper,
                settings: Arc::new(settings),
            },
            generation: AtomicU64::new(0),
            board: RwLock::new(ResultBoard::default()),
        }
    }

    pub fn llm(&self) -> &dyn LanguageModel {
        self.pipeline.llm.as_ref()
    }

    pub async fn generate_query(
        &self,
        platform: Platform,
        query: &str,
        profile: Option<&Profile>,
    ) -> AppResult<PlatformQuery> {
        let query = require_query(query)?;
        let summary = profile.map(summarize_profile);
        self.pipeline.generate(platform, query, summary.as_ref()).await
    }

    pub async fn select_sources(
        &self,
        query: &str,
        profile: Option<&Profile>,
    ) -> AppResult<SourceSelection> {
        let query = require_query(query)?;
        let summary = profile.map(summarize_profile);
        Ok(select_sources(self.llm(), QueryInput::new(query, summary.as_ref())).await?)
    }

    /// One platform end to end. Errors here are returned, not degraded.
    pub async fn search_platform(
        &self,
        platform: Platform,
        query: &str,
        profile: Option<&Profile>,
    ) -> AppResult<PlatformSearch> {
        let query = require_query(query)?;
        let summary = profile.map(summarize_profile);
        self.pipeline.run(platform, query, summary.as_ref()).await
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn board(&self) -> ResultBoard {
        self.board.read().await.clone()
    }

    /// Fan out across platforms; each finished pipeline is merged as it
    /// arrives and a failing platform only marks its own status.
    pub async fn search(&self, request: AggregatedSearchRequest) -> AppResult<AggregatedResults> {
        let query = require_query(&request.query)?.to_string();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let summary = request.profile.as_ref().map(summarize_profile);

        let (platforms, reasoning) = match request.sources {
            Some(explicit) if !explicit.is_empty() => (dedup_platforms(explicit), None),
            _ => {
                let selection = select_sources_or_default(
                    self.llm(),
                    QueryInput::new(&query, summary.as_ref()),
                )
                .await;
                (selection.platforms(), Some(selection.reasoning))
            }
        };

        info!(
            "Search #{} for \"{}\" across {:?}",
            generation, query, platforms
        );
        *self.board.write().await = ResultBoard::start(generation, &query, &platforms);

        let mut tasks = JoinSet::new();
        for platform in platforms.iter().copied() {
            let pipeline = self.pipeline.clone();
            let query = query.clone();
            let summary = summary.clone();
            tasks.spawn(async move {
                let outcome = pipeline.run(platform, &query, summary.as_ref()).await;
                (platform, outcome)
            });
        }

        let mut results = Vec::new();
        let mut reports: Vec<PlatformReport> = platforms
            .iter()
            .map(|&platform| PlatformReport {
                platform,
                status: PlatformStatus::Pending,
            })
            .collect();

        while let Some(joined) = tasks.join_next().await {
            let (platform, outcome) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    error!("Search pipeline task failed: {}", e);
                    continue;
                }
            };

            let (status, records) = match outcome {
                Ok(found) => (
                    PlatformStatus::Ok {
                        count: found.total_results,
                    },
                    found.results,
                ),
                Err(e) => {
                    warn!("[{}] no results from this platform: {}", platform, e);
                    (
                        PlatformStatus::Failed {
                            message: e.to_string(),
                        },
                        Vec::new(),
                    )
                }
            };

            if let Some(report) = reports.iter_mut().find(|r| r.platform == platform) {
                report.status = status.clone();
            }

            let mut board = self.board.write().await;
            if board.generation == generation {
                board.record(platform, status, records.clone());
            } else {
                info!(
                    "[{}] discarding results of superseded search #{}",
                    platform, generation
                );
            }
            drop(board);

            results.extend(records);
        }

        let superseded = self.current_generation() != generation;
        if !superseded {
            let mut board = self.board.write().await;
            if board.generation == generation {
                board.complete = true;
                board.updated_at = Some(Utc::now());
            }
        }

        info!(
            "Search #{} finished with {} results",
            generation,
            results.len()
        );

        Ok(AggregatedResults {
            generation,
            total_results: results.len(),
            results,
            platforms: reports,
            reasoning,
            superseded,
        })
    }
}

fn dedup_platforms(platforms: Vec<Platform>) -> Vec<Platform> {
    Platform::ALL
        .into_iter()
        .filter(|p| platforms.contains(p))
        .collect()
}
