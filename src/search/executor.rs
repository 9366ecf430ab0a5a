// src/search/executor.rs
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use super::relax::{Relaxable, RelaxationPlan};
use super::{ScrapeError, Scraper};
use crate::platform::Platform;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("could not encode search parameters: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw items plus a record of how they were obtained.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub items: Vec<Value>,
    pub attempts: usize,
    pub removed_fields: Vec<String>,
    /// Set when a timeout or upstream failure ended the search early.
    pub degraded: Option<String>,
}

async fn run_once(
    scraper: &dyn Scraper,
    actor_id: &str,
    input: Value,
    ceiling: Duration,
) -> Result<Vec<Value>, ScrapeError> {
    match tokio::time::timeout(ceiling, scraper.run(actor_id, input)).await {
        Ok(result) => result,
        Err(_) => Err(ScrapeError::Timeout(ceiling.as_secs())),
    }
}

/// Run the search, broadening it one field at a time while it returns nothing.
///
/// Timeouts and upstream failures end the search with no items; only
/// credential errors are returned.
pub async fn search_with_retry<P: Relaxable>(
    scraper: &dyn Scraper,
    platform: Platform,
    actor_id: &str,
    params: &P,
    ceiling: Duration,
) -> Result<SearchOutcome, SearchError> {
    let started = Instant::now();
    let mut plan = RelaxationPlan::new(params.clone());
    let mut outcome = SearchOutcome::default();

    loop {
        outcome.attempts += 1;
        let input = serde_json::to_value(plan.params())?;
        let attempt_started = Instant::now();

        match run_once(scraper, actor_id, input, ceiling).await {
            Ok(items) if !items.is_empty() => {
                info!(
                    "[{}] attempt {} returned {} items in {}ms",
                    platform,
                    outcome.attempts,
                    items.len(),
                    attempt_started.elapsed().as_millis()
                );
                outcome.items = items;
                break;
            }
            Ok(_) => {
                info!(
                    "[{}] attempt {} returned no items in {}ms",
                    platform,
                    outcome.attempts,
                    attempt_started.elapsed().as_millis()
                );
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!("[{}] search ended without results: {}", platform, e);
                outcome.degraded = Some(e.to_string());
                break;
            }
        }

        match plan.relax() {
            Some(field) => {
                info!("[{}] retry #{}: removed \"{}\"", platform, outcome.attempts, field);
                outcome.removed_fields.push(field.to_string());
            }
            None => {
                if outcome.attempts > 1 {
                    info!(
                        "[{}] no results after removing: {}",
                        platform,
                        outcome.removed_fields.join(", ")
                    );
                }
                break;
            }
        }
    }

    info!(
        "[{}] search finished: {} items, {} attempts, {}ms",
        platform,
        outcome.items.len(),
        outcome.attempts,
        started.elapsed().as_millis()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{IndeedParams, LinkedInParams, UpworkParams};
    use crate::testing::{FakeScraper, ScriptedRun};
    use serde_json::json;

    fn linkedin_params() -> LinkedInParams {
        LinkedInParams {
            title_search: Some(vec!["Engineer".into()]),
            description_search: Some(vec!["rust".into()]),
            organization_search: Some(vec!["Acme".into()]),
            industry_filter: Some(vec!["Software Development".into()]),
            ..LinkedInParams::default()
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_non_empty_result() {
        let scraper = FakeScraper::new(vec![
            ScriptedRun::Items(vec![]),
            ScriptedRun::Items(vec![json!({ "id": "1" })]),
            ScriptedRun::Items(vec![json!({ "id": "2" })]),
        ]);
        let outcome = search_with_retry(
            &scraper,
            Platform::LinkedIn,
            "actor/linkedin",
            &linkedin_params(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.items, vec![json!({ "id": "1" })]);
        assert_eq!(outcome.removed_fields, vec!["descriptionSearch"]);

        let calls = scraper.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].1.get("descriptionSearch").is_some());
        assert!(calls[1].1.get("descriptionSearch").is_none());
        assert_eq!(calls[1].1["organizationSearch"], json!(["Acme"]));
    }

    #[tokio::test]
    async fn test_exhaustion_is_empty_not_error() {
        let scraper = FakeScraper::always_empty();
        let params = linkedin_params();
        let outcome = search_with_retry(
            &scraper,
            Platform::LinkedIn,
            "actor/linkedin",
            &params,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        // three relaxable fields set: initial attempt plus one per removal
        assert_eq!(outcome.attempts, 4);
        assert!(outcome.attempts <= LinkedInParams::RELAXATION_ORDER.len() + 1);
        assert!(outcome.items.is_empty());
        assert!(outcome.degraded.is_none());

        // caller's parameters are untouched
        assert!(params.description_search.is_some());
        for (_, input) in scraper.calls() {
            assert_eq!(input["includeAi"], json!(false));
            assert_eq!(input["descriptionType"], json!("text"));
            assert_eq!(input["removeAgency"], json!(false));
        }
    }

    #[tokio::test]
    async fn test_single_attempt_platform() {
        let scraper = FakeScraper::always_empty();
        let params = IndeedParams {
            search_terms: vec!["Nurse".into()],
            country: "United States".into(),
            location: None,
            posted_since: "7 days".into(),
            max_results: 30,
        };
        let outcome = search_with_retry(
            &scraper,
            Platform::Indeed,
            "actor/indeed",
            &params,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(outcome.attempts, 1);
        assert_eq!(scraper.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_treated_as_empty() {
        let scraper = FakeScraper::new(vec![ScriptedRun::Hang]);
        let outcome = search_with_retry(
            &scraper,
            Platform::Upwork,
            "actor/upwork",
            &UpworkParams::default(),
            Duration::from_millis(20),
        )
        .await
        .unwrap();
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.degraded.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_upstream_failure_treated_as_empty() {
        let scraper = FakeScraper::new(vec![ScriptedRun::Fail]);
        let outcome = search_with_retry(
            &scraper,
            Platform::LinkedIn,
            "actor/linkedin",
            &linkedin_params(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert!(outcome.items.is_empty());
        assert_eq!(scraper.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_credential_error_is_returned() {
        let scraper = FakeScraper::new(vec![ScriptedRun::Unauthorized]);
        let result = search_with_retry(
            &scraper,
            Platform::LinkedIn,
            "actor/linkedin",
            &linkedin_params(),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(
            result,
            Err(SearchError::Scrape(ScrapeError::Unauthorized { .. }))
        ));
    }
}
