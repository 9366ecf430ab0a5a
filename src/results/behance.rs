// src/results/behance.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    generated_id, id_text, or_default, CompanyRef, DESCRIPTION_CHARS, DisplayRecord, PlatformDetails,
};
use crate::platform::Platform;
use crate::utils::{non_blank, sanitize_description};

const ACTIVE: &str = "ACTIVE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BehanceJob {
    pub job_id: Value,
    #[serde(deserialize_with = "or_default")]
    pub title: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub job_type: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub job_status: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub job_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub company_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub location: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub short_description: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub application_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub creator_name: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub creator_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub creator_image: Option<String>,
}

impl BehanceJob {
    pub fn identity(&self) -> Option<String> {
        id_text(&self.job_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub name: String,
    pub url: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehanceDetails {
    pub job_type: String,
    pub job_status: String,
    pub creator: Creator,
}

pub fn format_job_type(job_type: &str) -> String {
    match job_type.to_uppercase().as_str() {
        "FULLTIME" => "Full-time".to_string(),
        "FREELANCE" => "Freelance".to_string(),
        "PARTTIME" => "Part-time".to_string(),
        "CONTRACT" => "Contract".to_string(),
        "INTERNSHIP" => "Internship".to_string(),
        _ => job_type.to_string(),
    }
}

/// Closed postings are dropped after transformation.
pub fn is_active(record: &DisplayRecord) -> bool {
    matches!(&record.details, PlatformDetails::Behance(d) if d.job_status == ACTIVE)
}

pub fn transform(job: BehanceJob) -> DisplayRecord {
    let url = job.job_url.unwrap_or_default();
    let job_type = format_job_type(job.job_type.as_deref().unwrap_or_default());
    let location = non_blank(job.location).unwrap_or_else(|| "Anywhere".to_string());

    DisplayRecord {
        id: id_text(&job.job_id).unwrap_or_else(generated_id),
        source: Platform::Behance,
        title: non_blank(job.title).unwrap_or_else(|| "Untitled Position".to_string()),
        company: CompanyRef {
            name: non_blank(job.company_name).unwrap_or_else(|| "Unknown Company".to_string()),
            url: non_blank(job.company_url),
            logo: None,
        },
        apply_url: non_blank(job.application_url).or_else(|| non_blank(Some(url.clone()))),
        url,
        is_remote: location.eq_ignore_ascii_case("remote") || location == "Anywhere",
        location,
        employment_type: non_blank(Some(job_type.clone())),
        salary: None,
        description: job
            .short_description
            .as_deref()
            .map(|d| sanitize_description(d, DESCRIPTION_CHARS))
            .unwrap_or_default(),
        skills: Vec::new(),
        posted_at: None,
        details: PlatformDetails::Behance(BehanceDetails {
            job_type,
            job_status: non_blank(job.job_status).unwrap_or_else(|| ACTIVE.to_string()),
            creator: Creator {
                name: job.creator_name.unwrap_or_default(),
                url: job.creator_url.unwrap_or_default(),
                image: job.creator_image.unwrap_or_default(),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_type_labels() {
        assert_eq!(format_job_type("fulltime"), "Full-time");
        assert_eq!(format_job_type("INTERNSHIP"), "Internship");
        assert_eq!(format_job_type("Gig"), "Gig");
    }

    #[test]
    fn test_defaults_and_status() {
        let job: BehanceJob = serde_json::from_value(json!({
            "job_id": 7,
            "job_url": "https://behance.net/joblist/7",
            "job_type": "FREELANCE"
        }))
        .unwrap();
        let record = transform(job);
        assert_eq!(record.location, "Anywhere");
        assert_eq!(record.apply_url.as_deref(), Some("https://behance.net/joblist/7"));
        assert_eq!(record.employment_type.as_deref(), Some("Freelance"));
        assert!(is_active(&record));
    }
}
