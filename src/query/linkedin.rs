// src/query/linkedin.rs
use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    complete_json, non_empty, read_bool, read_enum_array, read_number, read_object, read_string,
    read_string_array, GeneratedQuery, GenerationError, QueryInput, GENERATION_TEMPERATURE,
};
use crate::llm::LanguageModel;
use crate::utils::query_terms;

const DEFAULT_LIMIT: f64 = 50.0;
const MIN_LIMIT: f64 = 10.0;
const MAX_LIMIT: f64 = 100.0;
const DEFAULT_TIME_RANGE: &str = "7d";
const TIME_RANGES: &[&str] = &["1h", "24h", "7d"];

const SENIORITY_LEVELS: &[&str] = &[
    "Associate",
    "Director",
    "Executive",
    "Mid-Senior level",
    "Entry level",
    "Not Applicable",
    "Internship",
];
const EMPLOYMENT_TYPES: &[&str] = &[
    "FULL_TIME",
    "PART_TIME",
    "CONTRACTOR",
    "TEMPORARY",
    "INTERN",
    "VOLUNTEER",
    "PER_DIEM",
    "OTHER",
];
const WORK_ARRANGEMENTS: &[&str] = &["On-site", "Hybrid", "Remote OK", "Remote Solely"];
const EXPERIENCE_LEVELS: &[&str] = &["0-2", "2-5", "5-10", "10+"];

/// Input of the LinkedIn job search actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInParams {
    pub time_range: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_exclusion_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_exclusion_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_exclusion_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_exclusion_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_description_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_description_exclusion_search: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority_filter: Option<Vec<String>>,
    #[serde(rename = "EmploymentTypeFilter", skip_serializing_if = "Option::is_none")]
    pub employment_type_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_work_arrangement_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_experience_level_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_taxonomies_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_taxonomies_primary_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_taxonomies_exclusion_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_apply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_apply_url: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_has_salary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_visa_sponsorship_filter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_employees_lte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_employees_gte: Option<u64>,
    // fixed
    pub include_ai: bool,
    pub description_type: String,
    pub remove_agency: bool,
}

impl Default for LinkedInParams {
    fn default() -> Self {
        Self {
            time_range: DEFAULT_TIME_RANGE.to_string(),
            limit: DEFAULT_LIMIT as u32,
            title_search: None,
            title_exclusion_search: None,
            location_search: None,
            location_exclusion_search: None,
            description_search: None,
            description_exclusion_search: None,
            organization_search: None,
            organization_exclusion_search: None,
            organization_description_search: None,
            organization_description_exclusion_search: None,
            seniority_filter: None,
            employment_type_filter: None,
            industry_filter: None,
            ai_work_arrangement_filter: None,
            ai_experience_level_filter: None,
            ai_taxonomies_filter: None,
            ai_taxonomies_primary_filter: None,
            ai_taxonomies_exclusion_filter: None,
            remote: None,
            direct_apply: None,
            external_apply_url: None,
            ai_has_salary: None,
            ai_visa_sponsorship_filter: None,
            organization_employees_lte: None,
            organization_employees_gte: None,
            include_ai: false,
            description_type: "text".to_string(),
            remove_agency: false,
        }
    }
}

fn read_count(map: &Map<String, Value>, key: &str) -> Option<u64> {
    read_number(map, key)
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u64)
}

/// Validate the model's open parameter object. Invalid values are dropped.
pub fn validate_params(raw: &Map<String, Value>) -> LinkedInParams {
    let limit = read_number(raw, "limit")
        .filter(|n| *n != 0.0)
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(MIN_LIMIT, MAX_LIMIT)
        .round() as u32;

    let time_range = read_string(raw, "timeRange")
        .filter(|t| TIME_RANGES.contains(&t.as_str()))
        .unwrap_or_else(|| DEFAULT_TIME_RANGE.to_string());

    let strings = |key: &str| non_empty(read_string_array(raw, key));

    LinkedInParams {
        time_range,
        limit,
        title_search: strings("titleSearch"),
        title_exclusion_search: strings("titleExclusionSearch"),
        location_search: strings("locationSearch"),
        location_exclusion_search: strings("locationExclusionSearch"),
        description_search: strings("descriptionSearch"),
        description_exclusion_search: strings("descriptionExclusionSearch"),
        organization_search: strings("organizationSearch"),
        organization_exclusion_search: strings("organizationExclusionSearch"),
        organization_description_search: strings("organizationDescriptionSearch"),
        organization_description_exclusion_search: strings(
            "organizationDescriptionExclusionSearch",
        ),
        seniority_filter: read_enum_array(raw, "seniorityFilter", SENIORITY_LEVELS),
        employment_type_filter: read_enum_array(raw, "EmploymentTypeFilter", EMPLOYMENT_TYPES),
        industry_filter: strings("industryFilter"),
        ai_work_arrangement_filter: read_enum_array(
            raw,
            "aiWorkArrangementFilter",
            WORK_ARRANGEMENTS,
        ),
        ai_experience_level_filter: read_enum_array(
            raw,
            "aiExperienceLevelFilter",
            EXPERIENCE_LEVELS,
        ),
        ai_taxonomies_filter: strings("aiTaxonomiesFilter"),
        ai_taxonomies_primary_filter: strings("aiTaxonomiesPrimaryFilter"),
        ai_taxonomies_exclusion_filter: strings("aiTaxonomiesExclusionFilter"),
        remote: read_bool(raw, "remote"),
        direct_apply: read_bool(raw, "directApply"),
        external_apply_url: read_bool(raw, "externalApplyUrl"),
        ai_has_salary: read_bool(raw, "aiHasSalary"),
        ai_visa_sponsorship_filter: read_bool(raw, "aiVisaSponsorshipFilter"),
        organization_employees_lte: read_count(raw, "organizationEmployeesLte"),
        organization_employees_gte: read_count(raw, "organizationEmployeesGte"),
        ..LinkedInParams::default()
    }
}

pub fn apply_fixed_overrides(mut params: LinkedInParams) -> LinkedInParams {
    params.include_ai = false;
    params.description_type = "text".to_string();
    params.remove_agency = false;
    params
}

/// Parse `{queries: [...]}`; a missing or non-array `queries` is unrepairable.
pub fn from_model_output(
    output: &Map<String, Value>,
    input: QueryInput<'_>,
    max_queries: usize,
) -> Result<Vec<GeneratedQuery<LinkedInParams>>, GenerationError> {
    let queries = output
        .get("queries")
        .and_then(Value::as_array)
        .ok_or_else(|| GenerationError::InvalidShape("missing queries array".to_string()))?;

    if queries.is_empty() {
        return Err(GenerationError::InvalidShape("queries array is empty".to_string()));
    }

    let empty = Map::new();
    Ok(queries
        .iter()
        .take(max_queries.max(1))
        .enumerate()
        .map(|(i, query)| {
            let query = query.as_object().unwrap_or(&empty);
            let mut params = validate_params(read_object(query, "params").unwrap_or(&empty));
            if params.title_search.is_none() && params.description_search.is_none() {
                params.title_search = non_empty(query_terms(input.query, 3));
            }

            GeneratedQuery {
                description: read_string(query, "description")
                    .unwrap_or_else(|| format!("Search Query {}", i + 1)),
                relevance_score: read_number(query, "relevanceScore").unwrap_or(5.0),
                reasoning: read_string(query, "reasoning")
                    .unwrap_or_else(|| "No reasoning provided".to_string()),
                params: apply_fixed_overrides(params),
            }
        })
        .collect())
}

pub async fn generate(
    llm: &dyn LanguageModel,
    input: QueryInput<'_>,
    query_count: usize,
) -> Result<Vec<GeneratedQuery<LinkedInParams>>, GenerationError> {
    let user_prompt = build_user_prompt(input, query_count);
    let output = complete_json(llm, SYSTEM_PROMPT, &user_prompt, GENERATION_TEMPERATURE).await?;
    from_model_output(&output, input, query_count)
}

fn build_user_prompt(input: QueryInput<'_>, query_count: usize) -> String {
    let profile = input
        .profile
        .and_then(|p| p.render_text())
        .map(|text| format!("## User's Profile\n{}", text))
        .unwrap_or_else(|| "## No profile data provided".to_string());

    format!(
        r#"Generate LinkedIn job search queries for the following:

## User's Search Query
"{query}"

{profile}

Generate exactly {count} optimized search {noun}. Take into account:
1. The explicit requirements in the query (title, location, time range)
2. The user's background and skills when a profile is given
3. Related job titles and synonyms
4. Industry alignment based on their experience

Return ONLY valid JSON matching the specified format."#,
        query = input.query,
        profile = profile,
        count = query_count,
        noun = if query_count == 1 { "query" } else { "queries" },
    )
}

const SYSTEM_PROMPT: &str = r#"You build LinkedIn job search queries for a job search API.

Analyse the user's search request and profile (if any) and produce structured parameters.

## Parameters

Time range:
- timeRange: "1h" | "24h" | "7d" ("7d" when no time is mentioned)

Search arrays (strings, ":*" suffix for prefix matching):
- titleSearch / titleExclusionSearch: job title terms to include / exclude
- locationSearch / locationExclusionSearch: full location names, never abbreviations
- descriptionSearch / descriptionExclusionSearch: terms in the job description (expensive, use sparingly)
- organizationSearch / organizationExclusionSearch: company names
- organizationDescriptionSearch / organizationDescriptionExclusionSearch: terms in company descriptions

Filters:
- remote: true to only show remote jobs
- seniorityFilter: "Associate", "Director", "Executive", "Mid-Senior level", "Entry level", "Not Applicable", "Internship"
- EmploymentTypeFilter: "FULL_TIME", "PART_TIME", "CONTRACTOR", "TEMPORARY", "INTERN", "VOLUNTEER", "PER_DIEM", "OTHER"
- industryFilter: exact LinkedIn industry names
- organizationEmployeesLte / organizationEmployeesGte: company size bounds
- externalApplyUrl / directApply: booleans
- limit: number of results between 10 and 100 (default 50)
- aiWorkArrangementFilter: "On-site", "Hybrid", "Remote OK", "Remote Solely"
- aiExperienceLevelFilter: "0-2", "2-5", "5-10", "10+"
- aiVisaSponsorshipFilter, aiHasSalary: booleans
- aiTaxonomiesFilter / aiTaxonomiesPrimaryFilter / aiTaxonomiesExclusionFilter: job categories such as "Technology", "Software", "Data & Analytics", "Finance & Accounting", "Healthcare", "Marketing", "Art & Design"

## Guidelines
1. "today" or "last 24 hours" means "24h", "just posted" means "1h", otherwise "7d".
2. Add sensible title variations ("Software Engineer" also "Developer", "Software Developer").
3. "remote" maps to aiWorkArrangementFilter ["Remote OK", "Remote Solely"], "hybrid" to ["Hybrid"], "on-site" to ["On-site"].
4. Use organizationDescriptionSearch to target industries the user has experience in.
5. Match seniority to the user's years of experience.
6. When several queries are requested, give each a different focus.

## Response format
{
  "queries": [
    {
      "description": "Human-readable description of this search",
      "params": { "titleSearch": ["..."] },
      "relevanceScore": 8,
      "reasoning": "Why this query was created"
    }
  ]
}
Only include the parameters you want to set."#;
