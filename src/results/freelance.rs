// src/results/freelance.rs
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use super::{
    generated_id, id_text, list_or_empty, or_default, CompanyRef, DESCRIPTION_CHARS, DisplayRecord,
    PlatformDetails,
};
use crate::platform::Platform;
use crate::utils::{non_blank, sanitize_description, truncate_chars};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FreelanceJob {
    pub project_id: Value,
    #[serde(deserialize_with = "or_default")]
    pub title: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub url: Option<String>,
    pub description: Value,
    #[serde(deserialize_with = "or_default")]
    pub bid_avg: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub bid_count: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub time_left: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub budget_range: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub minbudget: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub maxbudget: Option<String>,
    #[serde(deserialize_with = "list_or_empty")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub payment_verified: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub is_contest: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub featured: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub urgent: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub fulltime: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub query: Option<String>,
}

impl FreelanceJob {
    pub fn identity(&self) -> Option<String> {
        id_text(&self.project_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelanceDetails {
    pub budget_range: String,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub is_hourly: bool,
    pub bid_average: Option<f64>,
    pub bid_count: u64,
    pub time_left: String,
    pub payment_verified: bool,
    pub is_contest: bool,
    pub is_featured: bool,
    pub is_urgent: bool,
    pub is_fulltime: bool,
    pub matched_query: String,
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$?([\d,]+(?:\.\d+)?)").expect("amount regex must compile"))
}

/// First amount in strings such as `"$250"`, `"$1,200"` or `"$52 / hr"`.
pub fn parse_budget(text: Option<&str>) -> Option<f64> {
    let captures = amount_re().captures(text?)?;
    captures[1].replace(',', "").parse().ok()
}

pub fn is_hourly(budget_range: &str) -> bool {
    let lower = budget_range.to_lowercase();
    lower.contains("/ hr") || lower.contains("/hr")
}

fn description_text(description: &Value) -> String {
    match description {
        Value::Null => String::new(),
        Value::String(text) => sanitize_description(text, DESCRIPTION_CHARS),
        other => truncate_chars(&other.to_string(), DESCRIPTION_CHARS),
    }
}

pub fn transform(job: FreelanceJob) -> DisplayRecord {
    let budget_range = job.budget_range.unwrap_or_default();

    DisplayRecord {
        id: id_text(&job.project_id).unwrap_or_else(generated_id),
        source: Platform::Freelance,
        title: non_blank(job.title).unwrap_or_else(|| "Untitled Project".to_string()),
        company: CompanyRef {
            name: "Freelancer Client".to_string(),
            url: None,
            logo: None,
        },
        url: job.url.unwrap_or_default(),
        apply_url: None,
        location: "Remote".to_string(),
        is_remote: true,
        employment_type: Some(if job.fulltime.unwrap_or(false) {
            "Full-time".to_string()
        } else {
            "Project".to_string()
        }),
        salary: non_blank(Some(budget_range.clone())),
        description: description_text(&job.description),
        skills: job.skills,
        posted_at: None,
        details: PlatformDetails::Freelance(FreelanceDetails {
            is_hourly: is_hourly(&budget_range),
            min_budget: parse_budget(job.minbudget.as_deref()),
            max_budget: parse_budget(job.maxbudget.as_deref()),
            budget_range,
            bid_average: parse_budget(job.bid_avg.as_deref()),
            bid_count: job.bid_count.unwrap_or(0),
            time_left: job.time_left.unwrap_or_default(),
            payment_verified: job.payment_verified.unwrap_or(false),
            is_contest: job.is_contest.unwrap_or(false),
            is_featured: job.featured.unwrap_or(false),
            is_urgent: job.urgent.unwrap_or(false),
            is_fulltime: job.fulltime.unwrap_or(false),
            matched_query: job.query.unwrap_or_default(),
        }),
    }
}
