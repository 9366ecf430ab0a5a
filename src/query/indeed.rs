// src/query/indeed.rs
use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    complete_json, read_number, read_string, read_string_array, GeneratedQuery, GenerationError,
    QueryInput, GENERATION_TEMPERATURE,
};
use crate::llm::LanguageModel;
use crate::utils::{dedup_case_insensitive, query_terms};

const MAX_TERMS: usize = 3;
const DEFAULT_COUNTRY: &str = "United States";
const DEFAULT_POSTED_SINCE: &str = "7 days";
const POSTED_SINCE: &[&str] = &[
    "1 day", "3 days", "7 days", "14 days", "1 month", "3 months", "1 year",
];
const FIXED_MAX_RESULTS: u32 = 30;

pub const INDEED_COUNTRIES: &[&str] = &[
    "Argentina", "Australia", "Austria", "Bahrain", "Bangladesh", "Belgium", "Bulgaria", "Brazil",
    "Canada", "Chile", "China", "Colombia", "Costa Rica", "Croatia", "Cyprus", "Czech Republic",
    "Denmark", "Ecuador", "Egypt", "Estonia", "Finland", "France", "Germany", "Greece",
    "Hong Kong", "Hungary", "India", "Indonesia", "Ireland", "Israel", "Italy", "Japan", "Kuwait",
    "Latvia", "Lithuania", "Luxembourg", "Malaysia", "Malta", "Mexico", "Morocco", "Netherlands",
    "New Zealand", "Nigeria", "Norway", "Oman", "Pakistan", "Panama", "Peru", "Philippines",
    "Poland", "Portugal", "Qatar", "Romania", "Saudi Arabia", "Singapore", "Slovakia", "Slovenia",
    "South Africa", "South Korea", "Spain", "Sweden", "Switzerland", "Taiwan", "Thailand",
    "Turkey", "Ukraine", "United Arab Emirates", "United Kingdom", "United States", "Uruguay",
    "Venezuela", "Vietnam",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndeedParams {
    pub search_terms: Vec<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub posted_since: String,
    pub max_results: u32,
}

/// Canonical spelling of a supported country, matched case-insensitively.
pub fn canonical_country(raw: &str) -> Option<&'static str> {
    let wanted = raw.trim();
    INDEED_COUNTRIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(wanted))
}

pub fn validate_params(raw: &Map<String, Value>, query: &str) -> IndeedParams {
    let mut terms = read_string_array(raw, "search_terms");
    if terms.is_empty() {
        terms = query_terms(query, MAX_TERMS);
    }
    let search_terms = dedup_case_insensitive(terms)
        .into_iter()
        .take(MAX_TERMS)
        .collect();

    IndeedParams {
        search_terms,
        country: read_string(raw, "country")
            .and_then(|c| canonical_country(&c))
            .unwrap_or(DEFAULT_COUNTRY)
            .to_string(),
        location: read_string(raw, "location"),
        posted_since: read_string(raw, "posted_since")
            .filter(|p| POSTED_SINCE.contains(&p.as_str()))
            .unwrap_or_else(|| DEFAULT_POSTED_SINCE.to_string()),
        max_results: FIXED_MAX_RESULTS,
    }
}

pub fn apply_fixed_overrides(mut params: IndeedParams) -> IndeedParams {
    params.max_results = FIXED_MAX_RESULTS;
    params
}

pub fn from_model_output(
    output: &Map<String, Value>,
    input: QueryInput<'_>,
) -> GeneratedQuery<IndeedParams> {
    let params = apply_fixed_overrides(validate_params(output, input.query));

    GeneratedQuery {
        description: read_string(output, "description")
            .unwrap_or_else(|| format!("Search for {} jobs", params.search_terms.join(", "))),
        relevance_score: read_number(output, "relevanceScore")
            .filter(|s| *s != 0.0)
            .unwrap_or(7.0),
        reasoning: read_string(output, "reasoning")
            .unwrap_or_else(|| "Generated from user query and profile".to_string()),
        params,
    }
}

pub async fn generate(
    llm: &dyn LanguageModel,
    input: QueryInput<'_>,
) -> Result<GeneratedQuery<IndeedParams>, GenerationError> {
    let user_prompt = match input.profile {
        Some(_) => format!(
            "User Query: \"{}\"\n\n{}\n\nGenerate Indeed search parameters based on the query and profile.",
            input.query,
            input.profile_block()
        ),
        None => format!(
            "User Query: \"{}\"\n\nNo user profile available. Generate Indeed search parameters based on the query alone.",
            input.query
        ),
    };

    let output = complete_json(llm, SYSTEM_PROMPT, &user_prompt, GENERATION_TEMPERATURE).await?;
    Ok(from_model_output(&output, input))
}

const SYSTEM_PROMPT: &str = r#"You build Indeed job search parameters from a user's request and profile.

## Parameters

search_terms (array of strings, required): 2-3 job titles or skills, e.g. ["Software Engineer", "Python Developer"].

country (string, required): the country to search in, e.g. "United States", "United Kingdom", "Canada", "Germany", "United Arab Emirates", "India", "Singapore". Infer it from city mentions. Default "United States".

location (string, optional): city or region inside the country. Empty for a nationwide search.

posted_since (string, required): one of "1 day", "3 days", "7 days", "14 days", "1 month", "3 months". Default "7 days". "recent" or "new" means "3 days", "last month" means "1 month".

## Guidelines
1. Take titles and skills from the query and profile.
2. Infer the country from locations ("Dubai" is "United Arab Emirates", "London" is "United Kingdom").
3. Keep search_terms focused.
4. For broad requests ("find me a job") use titles from the profile.

## Response format
{
  "description": "Brief description of this search",
  "search_terms": ["term1", "term2"],
  "country": "Country Name",
  "location": "City or empty string",
  "posted_since": "7 days",
  "relevanceScore": 8,
  "reasoning": "Why these parameters were chosen"
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use serde_json::json;

    fn output(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_posted_since_defaults_when_invalid() {
        let params = validate_params(
            &output(json!({ "search_terms": ["Nurse"], "posted_since": "whenever" })),
            "nurse",
        );
        assert_eq!(params.posted_since, "7 days");
    }

    #[test]
    fn test_terms_backfilled_deduped_and_capped() {
        let params = validate_params(&output(json!({})), "senior data engineer in Berlin");
        assert_eq!(params.search_terms, vec!["senior", "data", "engineer"]);

        let params = validate_params(
            &output(json!({ "search_terms": ["Python", "python ", "SQL", "ETL", "Airflow"] })),
            "x",
        );
        assert_eq!(params.search_terms, vec!["Python", "SQL", "ETL"]);
    }

    #[test]
    fn test_country_canonicalised() {
        let params = validate_params(&output(json!({ "country": "united kingdom" })), "x");
        assert_eq!(params.country, "United Kingdom");
        let params = validate_params(&output(json!({ "country": "Atlantis" })), "x");
        assert_eq!(params.country, "United States");
    }

    #[test]
    fn test_location_omitted_when_blank() {
        let params = validate_params(&output(json!({ "location": "" })), "x");
        assert_eq!(params.location, None);
        let serialized = serde_json::to_value(&params).unwrap();
        assert!(serialized.get("location").is_none());
    }

    #[test]
    fn test_max_results_fixed() {
        let generated = from_model_output(
            &output(json!({ "search_terms": ["Chef"], "max_results": 500 })),
            QueryInput::new("chef", None),
        );
        assert_eq!(generated.params.max_results, 30);
        assert_eq!(generated.relevance_score, 7.0);
        assert_eq!(generated.reasoning, "Generated from user query and profile");
    }

    #[tokio::test]
    async fn test_generate_uses_default_description() {
        let llm = ScriptedModel::json(json!({ "search_terms": ["Barista"] }));
        let generated = generate(&llm, QueryInput::new("barista", None)).await.unwrap();
        assert_eq!(generated.description, "Search for Barista jobs");
    }
}
