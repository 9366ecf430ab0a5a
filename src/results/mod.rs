// src/results/mod.rs
//! Raw scraper items to unified display records.
//!
//! Transforms are total: a missing, `null` or mistyped field falls back to
//! its default without losing the rest of the item, and an item that is not
//! an object at all is treated as an empty record rather than dropped.

pub mod behance;
pub mod freelance;
pub mod indeed;
pub mod linkedin;
pub mod salary;
pub mod upwork;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::platform::Platform;

pub const DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Platform-specific fields carried next to the shared ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlatformDetails {
    LinkedIn(linkedin::LinkedInDetails),
    Upwork(Box<upwork::UpworkDetails>),
    Indeed(indeed::IndeedDetails),
    Behance(behance::BehanceDetails),
    Freelance(freelance::FreelanceDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub id: String,
    pub source: Platform,
    pub title: String,
    pub company: CompanyRef,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_url: Option<String>,
    pub location: String,
    pub is_remote: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub description: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
    pub details: PlatformDetails,
}

/// Field deserializer: `null` or a value of the wrong type becomes the default.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// List deserializer: keeps the elements that parse, anything but an array is empty.
pub(crate) fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Deserialize one raw item leniently; malformed items become defaults.
pub(crate) fn parse_raw<T: DeserializeOwned + Default>(platform: Platform, item: Value) -> T {
    serde_json::from_value(item).unwrap_or_else(|e| {
        warn!("[{}] malformed result item, using defaults: {}", platform, e);
        T::default()
    })
}

/// Order-preserving dedup by identity key; the first occurrence wins and
/// items without a key are always kept.
pub fn dedup_by_key<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> Option<String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| match key(item) {
            Some(k) => seen.insert(k),
            None => true,
        })
        .collect()
}

/// Id as text whether the scraper sent a string or a number.
pub(crate) fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn generated_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// `transformResults`: dedup by the platform's identity key, then map each item.
pub fn transform_results(platform: Platform, raw: Vec<Value>) -> Vec<DisplayRecord> {
    let received = raw.len();

    let records: Vec<DisplayRecord> = match platform {
        Platform::LinkedIn => raw
            .into_iter()
            .map(|item| linkedin::transform(parse_raw(platform, item)))
            .collect(),
        Platform::Upwork => raw
            .into_iter()
            .map(|item| upwork::transform(parse_raw(platform, item)))
            .collect(),
        Platform::Indeed => {
            let jobs: Vec<indeed::IndeedJob> =
                raw.into_iter().map(|item| parse_raw(platform, item)).collect();
            dedup_by_key(jobs, indeed::IndeedJob::identity)
                .into_iter()
                .map(indeed::transform)
                .collect()
        }
        Platform::Behance => {
            let jobs: Vec<behance::BehanceJob> =
                raw.into_iter().map(|item| parse_raw(platform, item)).collect();
            dedup_by_key(jobs, behance::BehanceJob::identity)
                .into_iter()
                .map(behance::transform)
                .filter(behance::is_active)
                .collect()
        }
        Platform::Freelance => {
            let jobs: Vec<freelance::FreelanceJob> =
                raw.into_iter().map(|item| parse_raw(platform, item)).collect();
            dedup_by_key(jobs, freelance::FreelanceJob::identity)
                .into_iter()
                .map(freelance::transform)
                .collect()
        }
    };

    debug!("[{}] transformed {} of {} raw items", platform, records.len(), received);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dedup_keeps_first_and_keyless() {
        let items = vec![("a", 1), ("", 2), ("a", 3), ("b", 4), ("", 5)];
        let kept = dedup_by_key(items, |(k, _)| (!k.is_empty()).then(|| k.to_string()));
        assert_eq!(kept, vec![("a", 1), ("", 2), ("b", 4), ("", 5)]);
    }

    #[test]
    fn test_id_text() {
        assert_eq!(id_text(&json!(123)), Some("123".to_string()));
        assert_eq!(id_text(&json!(" x1 ")), Some("x1".to_string()));
        assert_eq!(id_text(&json!(null)), None);
    }

    #[test]
    fn test_behance_duplicates_collapse() {
        let raw = vec![
            json!({ "job_id": 42, "title": "Illustrator", "job_status": "ACTIVE" }),
            json!({ "job_id": 42, "title": "Illustrator (copy)", "job_status": "ACTIVE" }),
            json!({ "job_id": 43, "title": "Closed role", "job_status": "CLOSED" }),
        ];
        let records = transform_results(Platform::Behance, raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "42");
        assert_eq!(records[0].title, "Illustrator");
    }

    #[test]
    fn test_malformed_item_still_transforms() {
        let records = transform_results(Platform::LinkedIn, vec![json!("not an object")]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Untitled Position");
        assert_eq!(records[0].source, Platform::LinkedIn);
    }

    #[test]
    fn test_null_and_mistyped_fields_keep_the_record() {
        let raw = vec![json!({
            "id": "li-42",
            "title": "Senior Rust Engineer",
            "organization": "Acme",
            "ai_key_skills": null,
            "linkedin_org_specialties": null,
            "ai_benefits": ["Pension", null, 7],
            "linkedin_org_employees": 12.5,
            "ai_salary_currency": "USD",
            "ai_salary_value": "50000",
            "salary_raw": { "currency": "EUR", "value": 60000, "unitText": null }
        })];
        let records = transform_results(Platform::LinkedIn, raw);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "li-42");
        assert_eq!(record.title, "Senior Rust Engineer");
        assert_eq!(record.company.name, "Acme");
        assert!(record.skills.is_empty());
        assert_eq!(record.salary.as_deref(), Some("EUR 60K / year"));
        match &record.details {
            PlatformDetails::LinkedIn(details) => {
                assert_eq!(details.benefits, vec!["Pension".to_string()]);
                assert_eq!(details.company_info.employees, None);
                assert!(details.company_info.specialties.is_empty());
            }
            other => panic!("expected LinkedIn details, got {:?}", other),
        }
    }

    #[test]
    fn test_null_fields_keep_dedup_keys() {
        let behance = transform_results(
            Platform::Behance,
            vec![
                json!({ "job_id": 7, "title": "Type designer", "job_status": null, "location": 3 }),
                json!({ "job_id": 7, "title": "Type designer (repost)" }),
            ],
        );
        assert_eq!(behance.len(), 1);
        assert_eq!(behance[0].id, "7");
        assert_eq!(behance[0].title, "Type designer");

        let freelance = transform_results(
            Platform::Freelance,
            vec![json!({
                "project_id": 99,
                "title": "Logo refresh",
                "skills": null,
                "bid_count": "twelve",
                "budget_range": "$30 - $250"
            })],
        );
        assert_eq!(freelance.len(), 1);
        assert_eq!(freelance[0].id, "99");
        assert_eq!(freelance[0].title, "Logo refresh");
        assert_eq!(freelance[0].salary.as_deref(), Some("$30 - $250"));
    }

    #[test]
    fn test_linkedin_and_upwork_not_deduplicated() {
        let raw = vec![json!({ "id": "1" }), json!({ "id": "1" })];
        assert_eq!(transform_results(Platform::LinkedIn, raw.clone()).len(), 2);
        assert_eq!(transform_results(Platform::Upwork, raw).len(), 2);
    }
}
