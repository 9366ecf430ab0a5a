// src/results/indeed.rs
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::salary::{format_amount, nonzero};
use super::{
    generated_id, or_default, CompanyRef, DESCRIPTION_CHARS, DisplayRecord, PlatformDetails,
};
use crate::platform::Platform;
use crate::utils::{non_blank, sanitize_description};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndeedJob {
    #[serde(deserialize_with = "or_default")]
    pub platform_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub official_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub title: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub posted_date: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub location: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub is_remote: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub description: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub job_type: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub job_level: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub job_function: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub listing_type: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub emails: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub skills: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub work_from_home: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub vacancy_count: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub experience_range: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub salary_period: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub salary_minimum: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub salary_maximum: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub salary_currency: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_industry: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_website: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_logo: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_addresses: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_revenue: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_description: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_rating: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub employee_count: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub review_count: Option<u64>,
}

impl IndeedJob {
    /// Postings are identified by their Indeed URL.
    pub fn identity(&self) -> Option<String> {
        non_blank(self.platform_url.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndeedDetails {
    pub official_url: Option<String>,
    pub work_from_home: Option<String>,
    pub job_level: Option<String>,
    pub job_function: Option<String>,
    pub listing_type: Option<String>,
    pub vacancy_count: Option<u64>,
    pub experience_range: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,
    pub company_industry: Option<String>,
    pub company_website: Option<String>,
    pub company_addresses: Option<String>,
    pub company_revenue: Option<String>,
    pub company_description: Option<String>,
    pub company_rating: Option<f64>,
    pub employee_count: Option<String>,
    pub review_count: Option<u64>,
    pub emails: Option<String>,
}

fn job_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"jk=([a-zA-Z0-9]+)").expect("job key regex must compile"))
}

/// The `jk` query parameter of an Indeed posting URL.
pub fn extract_job_key(url: &str) -> Option<String> {
    job_key_re()
        .captures(url)
        .map(|captures| captures[1].to_string())
}

fn split_skills(skills: Option<&str>) -> Vec<String> {
    skills
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn period_suffix(period: &str) -> String {
    match period {
        "yearly" => "/yr".to_string(),
        "monthly" => "/mo".to_string(),
        "weekly" => "/wk".to_string(),
        "hourly" => "/hr".to_string(),
        other => format!("/{}", other),
    }
}

pub fn format_salary(job: &IndeedJob) -> Option<String> {
    let currency = non_blank(job.salary_currency.clone()).unwrap_or_else(|| "USD".to_string());
    let period = non_blank(job.salary_period.clone()).unwrap_or_else(|| "yearly".to_string());

    let amount = match (nonzero(job.salary_minimum), nonzero(job.salary_maximum)) {
        (Some(min), Some(max)) => {
            format!("{} {} - {}", currency, format_amount(min), format_amount(max))
        }
        (Some(min), None) => format!("{} {}+", currency, format_amount(min)),
        (None, Some(max)) => format!("Up to {} {}", currency, format_amount(max)),
        (None, None) => return None,
    };
    Some(format!("{}{}", amount, period_suffix(&period)))
}

pub fn transform(job: IndeedJob) -> DisplayRecord {
    let url = job.platform_url.clone().unwrap_or_default();
    let salary = format_salary(&job);

    DisplayRecord {
        id: extract_job_key(&url).unwrap_or_else(generated_id),
        source: Platform::Indeed,
        title: non_blank(job.title).unwrap_or_else(|| "Untitled Position".to_string()),
        company: CompanyRef {
            name: non_blank(job.company_name).unwrap_or_else(|| "Unknown Company".to_string()),
            url: non_blank(job.company_url),
            logo: non_blank(job.company_logo),
        },
        url,
        apply_url: non_blank(job.official_url.clone()),
        location: non_blank(job.location).unwrap_or_else(|| "Location not specified".to_string()),
        is_remote: job.is_remote.unwrap_or(false),
        employment_type: non_blank(job.job_type),
        salary,
        description: job
            .description
            .as_deref()
            .map(|d| sanitize_description(d, DESCRIPTION_CHARS))
            .unwrap_or_default(),
        skills: split_skills(job.skills.as_deref()),
        posted_at: non_blank(job.posted_date),
        details: PlatformDetails::Indeed(IndeedDetails {
            official_url: job.official_url,
            work_from_home: job.work_from_home,
            job_level: job.job_level,
            job_function: job.job_function,
            listing_type: job.listing_type,
            vacancy_count: job.vacancy_count,
            experience_range: job.experience_range,
            salary_min: job.salary_minimum,
            salary_max: job.salary_maximum,
            salary_currency: job.salary_currency,
            salary_period: job.salary_period,
            company_industry: job.company_industry,
            company_website: job.company_website,
            company_addresses: job.company_addresses,
            company_revenue: job.company_revenue,
            company_description: job.company_description,
            company_rating: job.company_rating,
            employee_count: job.employee_count,
            review_count: job.review_count,
            emails: job.emails,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::transform_results;
    use serde_json::json;

    #[test]
    fn test_job_key() {
        assert_eq!(
            extract_job_key("https://www.indeed.com/viewjob?jk=ab12CD34&from=serp").as_deref(),
            Some("ab12CD34")
        );
        assert_eq!(extract_job_key("https://www.indeed.com/viewjob"), None);
    }

    #[test]
    fn test_salary_shapes() {
        let mut job = IndeedJob {
            salary_minimum: Some(60000.0),
            salary_maximum: Some(80000.0),
            ..IndeedJob::default()
        };
        assert_eq!(format_salary(&job).as_deref(), Some("USD 60K - 80K/yr"));

        job.salary_maximum = None;
        job.salary_period = Some("hourly".into());
        job.salary_minimum = Some(25.0);
        assert_eq!(format_salary(&job).as_deref(), Some("USD 25+/hr"));

        job.salary_minimum = None;
        job.salary_maximum = Some(4000.0);
        job.salary_period = Some("daily".into());
        job.salary_currency = Some("GBP".into());
        assert_eq!(format_salary(&job).as_deref(), Some("Up to GBP 4K/daily"));

        assert_eq!(format_salary(&IndeedJob::default()), None);
    }

    #[test]
    fn test_transform_dedups_by_url() {
        let raw = vec![
            json!({ "platform_url": "https://indeed.com/viewjob?jk=aaa", "title": "Nurse",
                    "skills": "Triage, , Care ", "description": "### Duties\n\\- lift" }),
            json!({ "platform_url": "https://indeed.com/viewjob?jk=aaa", "title": "Nurse again" }),
            json!({ "title": "No url" }),
        ];
        let records = transform_results(Platform::Indeed, raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "aaa");
        assert_eq!(records[0].skills, vec!["Triage", "Care"]);
        assert_eq!(records[0].description, "Duties\n- lift");
        assert_eq!(records[1].location, "Location not specified");
    }
}
