// src/results/linkedin.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::salary::{format_range, nonzero};
use super::{
    generated_id, id_text, list_or_empty, or_default, CompanyRef, DESCRIPTION_CHARS, DisplayRecord,
    PlatformDetails,
};
use crate::platform::Platform;
use crate::utils::{non_blank, sanitize_description, truncate_chars};

const COMPANY_DESCRIPTION_CHARS: usize = 300;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DerivedLocation {
    #[serde(deserialize_with = "or_default")]
    pub city: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub admin: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub country: Option<String>,
}

impl DerivedLocation {
    fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.admin, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSalary {
    #[serde(deserialize_with = "or_default")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub value: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub min_value: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub max_value: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub unit_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinkedInJob {
    pub id: Value,
    #[serde(deserialize_with = "or_default")]
    pub title: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub organization: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub organization_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub organization_logo: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub external_apply_url: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub date_posted: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub date_validthrough: Option<String>,
    #[serde(deserialize_with = "list_or_empty")]
    pub locations_derived: Vec<DerivedLocation>,
    #[serde(deserialize_with = "list_or_empty")]
    pub cities_derived: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub remote_derived: Option<bool>,
    #[serde(deserialize_with = "list_or_empty")]
    pub employment_type: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub seniority: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub salary_raw: Option<RawSalary>,
    #[serde(deserialize_with = "or_default")]
    pub description_text: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub directapply: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub linkedin_org_employees: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub linkedin_org_industry: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub linkedin_org_description: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub linkedin_org_recruitment_agency_derived: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub linkedin_org_size: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub linkedin_org_headquarters: Option<String>,
    #[serde(deserialize_with = "list_or_empty")]
    pub linkedin_org_specialties: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub ai_salary_currency: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub ai_salary_value: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub ai_salary_minvalue: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub ai_salary_maxvalue: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub ai_salary_unittext: Option<String>,
    #[serde(deserialize_with = "list_or_empty")]
    pub ai_benefits: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub ai_experience_level: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub ai_work_arrangement: Option<String>,
    #[serde(deserialize_with = "list_or_empty")]
    pub ai_key_skills: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub ai_core_responsibilities: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub ai_requirements_summary: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub ai_visa_sponsorship: Option<bool>,
    #[serde(deserialize_with = "list_or_empty")]
    pub ai_taxonomies_a: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInCompanyInfo {
    pub industry: Option<String>,
    pub size: Option<String>,
    pub employees: Option<u64>,
    pub headquarters: Option<String>,
    pub description: Option<String>,
    pub specialties: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInDetails {
    pub work_arrangement: Option<String>,
    pub seniority: Option<String>,
    pub experience_level: Option<String>,
    pub date_valid_through: Option<String>,
    pub core_responsibilities: Option<String>,
    pub requirements_summary: Option<String>,
    pub benefits: Vec<String>,
    pub visa_sponsorship: Option<bool>,
    pub taxonomies: Vec<String>,
    pub company_info: LinkedInCompanyInfo,
    pub is_direct_apply: bool,
    pub is_agency: bool,
}

/// Model-enriched salary first, then the posting's own salary block.
pub fn format_salary(job: &LinkedInJob) -> Option<String> {
    let enriched = non_blank(job.ai_salary_currency.clone())
        .filter(|_| {
            nonzero(job.ai_salary_value).is_some() || nonzero(job.ai_salary_minvalue).is_some()
        })
        .and_then(|currency| {
            format_range(
                &currency,
                job.ai_salary_minvalue,
                job.ai_salary_maxvalue,
                job.ai_salary_value,
                job.ai_salary_unittext.as_deref(),
            )
        });

    enriched.or_else(|| {
        let raw = job.salary_raw.as_ref()?;
        format_range(
            raw.currency.as_deref().unwrap_or_default(),
            raw.min_value,
            raw.max_value,
            raw.value,
            raw.unit_text.as_deref(),
        )
    })
}

pub fn transform(job: LinkedInJob) -> DisplayRecord {
    let location = job
        .locations_derived
        .first()
        .and_then(DerivedLocation::display)
        .or_else(|| non_blank(job.cities_derived.first().cloned()))
        .unwrap_or_else(|| "Location not specified".to_string());

    let is_remote = job.remote_derived.unwrap_or(false)
        || job
            .ai_work_arrangement
            .as_deref()
            .is_some_and(|a| a.contains("Remote"));

    let salary = format_salary(&job);

    DisplayRecord {
        id: id_text(&job.id).unwrap_or_else(generated_id),
        source: Platform::LinkedIn,
        title: non_blank(job.title).unwrap_or_else(|| "Untitled Position".to_string()),
        company: CompanyRef {
            name: non_blank(job.organization).unwrap_or_else(|| "Unknown Company".to_string()),
            url: non_blank(job.organization_url),
            logo: non_blank(job.organization_logo),
        },
        url: job.url.unwrap_or_default(),
        apply_url: non_blank(job.external_apply_url),
        location,
        is_remote,
        employment_type: Some(
            non_blank(job.employment_type.into_iter().next())
                .unwrap_or_else(|| "FULL_TIME".to_string()),
        ),
        salary,
        description: job
            .description_text
            .as_deref()
            .map(|d| sanitize_description(d, DESCRIPTION_CHARS))
            .unwrap_or_default(),
        skills: job.ai_key_skills,
        posted_at: non_blank(job.date_posted),
        details: PlatformDetails::LinkedIn(LinkedInDetails {
            work_arrangement: job.ai_work_arrangement,
            seniority: job.seniority,
            experience_level: job.ai_experience_level,
            date_valid_through: job.date_validthrough,
            core_responsibilities: job.ai_core_responsibilities,
            requirements_summary: job.ai_requirements_summary,
            benefits: job.ai_benefits,
            visa_sponsorship: job.ai_visa_sponsorship,
            taxonomies: job.ai_taxonomies_a,
            company_info: LinkedInCompanyInfo {
                industry: job.linkedin_org_industry,
                size: job.linkedin_org_size,
                employees: job.linkedin_org_employees,
                headquarters: job.linkedin_org_headquarters,
                description: job
                    .linkedin_org_description
                    .map(|d| truncate_chars(&d, COMPANY_DESCRIPTION_CHARS)),
                specialties: job.linkedin_org_specialties,
            },
            is_direct_apply: job.directapply.unwrap_or(false),
            is_agency: job.linkedin_org_recruitment_agency_derived.unwrap_or(false),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(value: Value) -> LinkedInJob {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_enriched_salary_preferred() {
        let j = job(json!({
            "ai_salary_currency": "USD",
            "ai_salary_minvalue": 90000,
            "ai_salary_maxvalue": 1200000,
            "ai_salary_unittext": "YEAR",
            "salary_raw": { "currency": "USD", "value": 1 }
        }));
        assert_eq!(format_salary(&j).as_deref(), Some("USD 90K - 1.2M / year"));
    }

    #[test]
    fn test_raw_salary_fallback() {
        let j = job(json!({
            "ai_salary_currency": "USD",
            "salary_raw": { "value": 45, "unitText": "HOUR" }
        }));
        assert_eq!(format_salary(&j).as_deref(), Some("45 / hour"));

        assert_eq!(format_salary(&job(json!({}))), None);
    }

    #[test]
    fn test_transform_defaults() {
        let record = transform(job(json!({})));
        assert_eq!(record.title, "Untitled Position");
        assert_eq!(record.company.name, "Unknown Company");
        assert_eq!(record.location, "Location not specified");
        assert_eq!(record.employment_type.as_deref(), Some("FULL_TIME"));
        assert!(!record.is_remote);
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_transform_fields() {
        let record = transform(job(json!({
            "id": "li-1",
            "title": "Rust Engineer",
            "organization": "Acme",
            "url": "https://linkedin.com/jobs/1",
            "locations_derived": [{ "city": "Berlin", "country": "Germany" }],
            "ai_work_arrangement": "Remote OK",
            "employment_type": ["CONTRACTOR"],
            "description_text": "## About\n**Great** <b>team</b>",
            "ai_key_skills": ["Rust", "Tokio"]
        })));
        assert_eq!(record.id, "li-1");
        assert_eq!(record.location, "Berlin, Germany");
        assert!(record.is_remote);
        assert_eq!(record.employment_type.as_deref(), Some("CONTRACTOR"));
        assert_eq!(record.description, "About\nGreat team");
        assert_eq!(record.skills, vec!["Rust", "Tokio"]);
    }
}
