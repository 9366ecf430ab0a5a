// src/query/freelance.rs
use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    complete_json, read_number, read_string, read_string_array, GeneratedQuery, GenerationError,
    QueryInput, GENERATION_TEMPERATURE,
};
use crate::llm::LanguageModel;
use crate::utils::{dedup_case_insensitive, query_terms};

const MAX_TERMS: usize = 3;
const MAX_TERM_CHARS: usize = 50;
const FIXED_ITEM_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfiguration {
    pub use_apify_proxy: bool,
    pub apify_proxy_groups: Vec<String>,
}

impl ProxyConfiguration {
    fn residential() -> Self {
        Self {
            use_apify_proxy: true,
            apify_proxy_groups: vec!["RESIDENTIAL".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreelanceParams {
    pub queries: Vec<String>,
    pub item_limit: u32,
    #[serde(rename = "proxyConfiguration")]
    pub proxy_configuration: ProxyConfiguration,
}

fn keep_terms(terms: Vec<String>) -> Vec<String> {
    dedup_case_insensitive(
        terms
            .into_iter()
            .filter(|t| t.chars().count() <= MAX_TERM_CHARS),
    )
    .into_iter()
    .take(MAX_TERMS)
    .collect()
}

/// Model terms when any survive the length filter, otherwise words from the query.
pub fn clean_terms(raw: Vec<String>, query: &str) -> Vec<String> {
    let kept = keep_terms(raw);
    if kept.is_empty() {
        keep_terms(query_terms(query, MAX_TERMS))
    } else {
        kept
    }
}

pub fn apply_fixed_overrides(mut params: FreelanceParams) -> FreelanceParams {
    params.item_limit = FIXED_ITEM_LIMIT;
    params.proxy_configuration = ProxyConfiguration::residential();
    params
}

pub fn from_model_output(
    output: &Map<String, Value>,
    input: QueryInput<'_>,
) -> GeneratedQuery<FreelanceParams> {
    let queries = clean_terms(read_string_array(output, "queries"), input.query);

    GeneratedQuery {
        description: read_string(output, "description")
            .unwrap_or_else(|| format!("Search for: {}", queries.join(", "))),
        relevance_score: read_number(output, "relevanceScore")
            .filter(|s| *s != 0.0)
            .unwrap_or(7.0),
        reasoning: read_string(output, "reasoning")
            .unwrap_or_else(|| "Generated from user query and profile".to_string()),
        params: apply_fixed_overrides(FreelanceParams {
            queries,
            item_limit: FIXED_ITEM_LIMIT,
            proxy_configuration: ProxyConfiguration::residential(),
        }),
    }
}

pub async fn generate(
    llm: &dyn LanguageModel,
    input: QueryInput<'_>,
) -> Result<GeneratedQuery<FreelanceParams>, GenerationError> {
    let user_prompt = match input.profile {
        Some(_) => format!(
            "User Query: \"{}\"\n\n{}\n\nGenerate search terms based on the query and profile.",
            input.query,
            input.profile_block()
        ),
        None => format!(
            "User Query: \"{}\"\n\nNo user profile available. Generate search terms based on the query alone.",
            input.query
        ),
    };

    let output = complete_json(llm, SYSTEM_PROMPT, &user_prompt, GENERATION_TEMPERATURE).await?;
    Ok(from_model_output(&output, input))
}

const SYSTEM_PROMPT: &str = r#"You choose search terms for the Freelance.com project search.

## Output
queries: an array of exactly 3 search terms, each a skill ("Python", "WordPress"), a technology ("Node.js", "AWS") or a role ("Data Analyst"). Each term is 1-3 words.

## Guidelines
1. Draw skills and technologies from the query and from the profile (titles, certifications, education, industry).
2. Prefer terms commonly used on freelance marketplaces.
3. Focus on marketable, in-demand skills.

## Examples
"Find me Python jobs" with ML certifications and fintech experience -> ["Python", "Machine Learning", "FinTech"]
"Web development work" with React and WordPress experience -> ["React", "WordPress", "JavaScript"]

## Response format
{
  "description": "Brief description of what these search terms target",
  "queries": ["term1", "term2", "term3"],
  "relevanceScore": 8,
  "reasoning": "Why these terms were chosen"
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_terms_cleaned() {
        let long = "x".repeat(51);
        let terms = clean_terms(
            vec![
                "React".into(),
                long,
                "react".into(),
                "WordPress".into(),
                "PHP".into(),
                "Laravel".into(),
            ],
            "ignored",
        );
        assert_eq!(terms, vec!["React", "WordPress", "PHP"]);
    }

    #[test]
    fn test_terms_backfilled_from_query() {
        assert_eq!(clean_terms(Vec::new(), "a go developer for api"), vec!["developer", "for", "api"]);
    }

    #[test]
    fn test_overlong_terms_fall_back_to_query() {
        let overlong = "senior full stack developer with kubernetes and terraform experience".to_string();
        assert!(overlong.chars().count() > 50);
        assert_eq!(
            clean_terms(vec![overlong], "wordpress plugin fix"),
            vec!["wordpress", "plugin", "fix"]
        );
    }

    #[test]
    fn test_fixed_fields() {
        let output = json!({ "queries": ["Rust"], "item_limit": 200 });
        let generated = from_model_output(output.as_object().unwrap(), QueryInput::new("rust", None));
        let serialized = serde_json::to_value(&generated.params).unwrap();
        assert_eq!(serialized["item_limit"], json!(10));
        assert_eq!(
            serialized["proxyConfiguration"],
            json!({ "useApifyProxy": true, "apifyProxyGroups": ["RESIDENTIAL"] })
        );
        assert_eq!(generated.description, "Search for: Rust");
    }
}
