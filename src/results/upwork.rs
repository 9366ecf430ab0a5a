// src/results/upwork.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::salary::{group_thousands, nonzero};
use super::{
    generated_id, id_text, list_or_empty, or_default, CompanyRef, DisplayRecord, PlatformDetails,
};
use crate::platform::Platform;
use crate::utils::{non_blank, sanitize_description};

pub const UPWORK_DESCRIPTION_CHARS: usize = 1500;
const RECENT_REVIEWS: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBudget {
    #[serde(rename = "type", deserialize_with = "or_default")]
    pub budget_type: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub fixed_amount: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub min_hourly_rate: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub max_hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Feedback {
    #[serde(deserialize_with = "or_default")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Contractor {
    #[serde(deserialize_with = "or_default")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryItem {
    #[serde(deserialize_with = "or_default")]
    pub title: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub feedback_to_worker: Option<Feedback>,
    #[serde(deserialize_with = "or_default")]
    pub feedback_to_client: Option<Feedback>,
    #[serde(deserialize_with = "or_default")]
    pub contractor: Option<Contractor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientLocation {
    #[serde(deserialize_with = "or_default")]
    pub city: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientStats {
    #[serde(deserialize_with = "or_default")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub feedback_count: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub total_spent: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub avg_hourly_rate: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub total_job_posted: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub hire_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawClient {
    pub id: Value,
    #[serde(deserialize_with = "or_default")]
    pub name: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub industry: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub size: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub payment_verified: Option<bool>,
    #[serde(deserialize_with = "or_default")]
    pub location: Option<ClientLocation>,
    #[serde(deserialize_with = "or_default")]
    pub stats: Option<ClientStats>,
    #[serde(deserialize_with = "list_or_empty")]
    pub job_history: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Qualifications {
    #[serde(deserialize_with = "list_or_empty")]
    pub countries: Vec<String>,
    #[serde(deserialize_with = "list_or_empty")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub min_job_success_score: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub pref_english_skill: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub rising_talent: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Activity {
    #[serde(deserialize_with = "or_default")]
    pub total_applicants: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub client_last_viewed: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub interviewing: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpworkJob {
    pub id: Value,
    #[serde(deserialize_with = "or_default")]
    pub link: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub title: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub description: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub budget: Option<RawBudget>,
    #[serde(deserialize_with = "list_or_empty")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub published_at: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub person_to_hire: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub category_group: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub category: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub workload: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub contractor_tier: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub qualifications: Option<Qualifications>,
    #[serde(deserialize_with = "list_or_empty")]
    pub questions: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub connect_required: Option<u64>,
    #[serde(deserialize_with = "or_default")]
    pub client: Option<RawClient>,
    #[serde(deserialize_with = "or_default")]
    pub activity: Option<Activity>,
    #[serde(deserialize_with = "list_or_empty")]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReview {
    pub job_title: String,
    pub freelancer_name: String,
    pub score_given: f64,
    pub score_received: f64,
    pub comment_given: String,
    pub comment_received: String,
}

/// Trust signals derived from the client's hiring history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAverages {
    pub avg_rating_given: f64,
    pub avg_rating_received: f64,
    pub recent_reviews: Vec<ClientReview>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpworkClientSummary {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub company_size: u64,
    pub payment_verified: bool,
    pub city: String,
    pub country: String,
    pub rating: f64,
    pub feedback_count: u64,
    pub total_spent: f64,
    pub avg_hourly_rate: f64,
    pub total_jobs_posted: u64,
    pub hire_rate: f64,
    #[serde(flatten)]
    pub reviews: ReviewAverages,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpworkDetails {
    pub budget_type: Option<String>,
    pub budget_amount: Option<f64>,
    pub hourly_rate_min: Option<f64>,
    pub hourly_rate_max: Option<f64>,
    pub category: String,
    pub category_group: String,
    pub experience_level: Option<String>,
    pub duration: Option<String>,
    pub workload: Option<String>,
    pub questions: Vec<String>,
    pub total_applicants: u64,
    pub connects_required: u64,
    pub client_last_viewed: Option<String>,
    pub interviewing: u64,
    pub client: UpworkClientSummary,
    pub required_countries: Vec<String>,
    pub required_languages: Vec<String>,
    pub min_job_success_score: f64,
    pub preferred_english_skill: String,
    pub rising_talent_only: bool,
    pub person_to_hire: u64,
    pub attachments: Vec<String>,
}

fn positive_scores(scores: impl Iterator<Item = Option<f64>>) -> Vec<f64> {
    scores.flatten().filter(|s| *s > 0.0).collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Averages over scores above zero; the first five history entries as reviews.
pub fn review_averages(history: &[HistoryItem]) -> ReviewAverages {
    let given = positive_scores(
        history
            .iter()
            .map(|h| h.feedback_to_worker.as_ref().and_then(|f| f.score)),
    );
    let received = positive_scores(
        history
            .iter()
            .map(|h| h.feedback_to_client.as_ref().and_then(|f| f.score)),
    );

    let recent_reviews = history
        .iter()
        .take(RECENT_REVIEWS)
        .map(|h| {
            let to_worker = h.feedback_to_worker.clone().unwrap_or_default();
            let to_client = h.feedback_to_client.clone().unwrap_or_default();
            ClientReview {
                job_title: h.title.clone().unwrap_or_default(),
                freelancer_name: h
                    .contractor
                    .as_ref()
                    .and_then(|c| non_blank(c.name.clone()))
                    .unwrap_or_else(|| "Unknown".to_string()),
                score_given: to_worker.score.unwrap_or(0.0),
                score_received: to_client.score.unwrap_or(0.0),
                comment_given: to_worker.comment.unwrap_or_default(),
                comment_received: to_client.comment.unwrap_or_default(),
            }
        })
        .collect();

    ReviewAverages {
        avg_rating_given: mean(&given),
        avg_rating_received: mean(&received),
        recent_reviews,
    }
}

pub fn format_budget(budget: &RawBudget) -> Option<String> {
    match budget.budget_type.as_deref() {
        Some("FIXED") => nonzero(budget.fixed_amount)
            .map(|amount| format!("${} Fixed", group_thousands(amount))),
        Some("HOURLY") => Some(
            match (nonzero(budget.min_hourly_rate), nonzero(budget.max_hourly_rate)) {
                (Some(min), Some(max)) => format!("${} - ${}/hr", min, max),
                (None, Some(max)) => format!("Up to ${}/hr", max),
                (Some(min), None) => format!("From ${}/hr", min),
                (None, None) => "Hourly".to_string(),
            },
        ),
        _ => None,
    }
}

pub fn transform(job: UpworkJob) -> DisplayRecord {
    let budget = job.budget.clone().unwrap_or_default();
    let client = job.client.unwrap_or_default();
    let stats = client.stats.clone().unwrap_or_default();
    let client_location = client.location.clone().unwrap_or_default();
    let qualifications = job.qualifications.unwrap_or_default();
    let activity = job.activity.unwrap_or_default();
    let is_fixed = budget.budget_type.as_deref() == Some("FIXED");
    let is_hourly = budget.budget_type.as_deref() == Some("HOURLY");

    let client_summary = UpworkClientSummary {
        id: id_text(&client.id).unwrap_or_default(),
        name: client.name.clone().unwrap_or_default(),
        industry: client.industry.clone().unwrap_or_default(),
        company_size: client.size.unwrap_or(0),
        payment_verified: client.payment_verified.unwrap_or(false),
        city: client_location.city.unwrap_or_default(),
        country: client_location.country.unwrap_or_default(),
        rating: stats.score.unwrap_or(0.0),
        feedback_count: stats.feedback_count.unwrap_or(0),
        total_spent: stats.total_spent.unwrap_or(0.0),
        avg_hourly_rate: stats.avg_hourly_rate.unwrap_or(0.0),
        total_jobs_posted: stats.total_job_posted.unwrap_or(0),
        hire_rate: stats.hire_rate.unwrap_or(0.0),
        reviews: review_averages(&client.job_history),
    };

    let location = non_blank(Some(client_summary.country.clone()))
        .unwrap_or_else(|| "Remote".to_string());

    DisplayRecord {
        id: id_text(&job.id).unwrap_or_else(generated_id),
        source: Platform::Upwork,
        title: non_blank(job.title).unwrap_or_else(|| "Untitled Job".to_string()),
        company: CompanyRef {
            name: non_blank(client.name).unwrap_or_else(|| "Upwork Client".to_string()),
            url: None,
            logo: None,
        },
        url: job.link.unwrap_or_default(),
        apply_url: None,
        location,
        is_remote: true,
        employment_type: budget.budget_type.clone(),
        salary: format_budget(&budget),
        description: job
            .description
            .as_deref()
            .map(|d| sanitize_description(d, UPWORK_DESCRIPTION_CHARS))
            .unwrap_or_default(),
        skills: job.skills,
        posted_at: non_blank(job.published_at),
        details: PlatformDetails::Upwork(Box::new(UpworkDetails {
            budget_type: budget.budget_type.clone(),
            budget_amount: if is_fixed { budget.fixed_amount } else { None },
            hourly_rate_min: if is_hourly { budget.min_hourly_rate } else { None },
            hourly_rate_max: if is_hourly { budget.max_hourly_rate } else { None },
            category: job.category.unwrap_or_default(),
            category_group: job.category_group.unwrap_or_default(),
            experience_level: job.contractor_tier,
            duration: job.duration,
            workload: job.workload,
            questions: job.questions,
            total_applicants: activity.total_applicants.unwrap_or(0),
            connects_required: job.connect_required.unwrap_or(0),
            client_last_viewed: non_blank(activity.client_last_viewed),
            interviewing: activity.interviewing.unwrap_or(0),
            client: client_summary,
            required_countries: qualifications.countries,
            required_languages: qualifications.languages,
            min_job_success_score: qualifications.min_job_success_score.unwrap_or(0.0),
            preferred_english_skill: qualifications
                .pref_english_skill
                .unwrap_or_else(|| "ANY".to_string()),
            rising_talent_only: qualifications.rising_talent.unwrap_or(false),
            person_to_hire: job.person_to_hire.unwrap_or(0),
            attachments: job.attachments,
        })),
    }
}
