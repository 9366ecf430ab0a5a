// src/query/upwork.rs
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::keywords::augment_keywords;
use super::{
    complete_json, read_bool, read_enum_array, read_number, read_object, read_string,
    GeneratedQuery, GenerationError, QueryInput, GENERATION_TEMPERATURE,
};
use crate::llm::LanguageModel;

const EXPERIENCE_LEVELS: &[&str] = &["entry_level", "intermediate", "expert"];
const PROPOSAL_BUCKETS: &[&str] = &["less_than_5", "5_to_10", "10_to_15", "15_to_20", "20_to_50"];
const PROJECT_LENGTHS: &[&str] = &[
    "less_than_1_month",
    "1_to_3_months",
    "3_to_6_months",
    "more_than_6_months",
];
const HOURS_PER_WEEK: &[&str] = &["less_than_30", "more_than_30"];

const FIXED_LIMIT: u32 = 50;
const FIXED_SORT: &str = "relevance";
const FIXED_CLIENT_HISTORY: [&str; 2] = ["1_to_9_hires", "10_plus_hires"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpworkBudget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_budget_hourly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_budget_hourly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_price: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_budget_fixed_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_budget_fixed_price: Option<f64>,
}

impl UpworkBudget {
    fn is_empty(&self) -> bool {
        self == &UpworkBudget::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpworkParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<UpworkBudget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numbers_of_proposals: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_length: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_per_week: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_to_hire_role: Option<bool>,
    pub limit: u32,
    pub sortby: String,
    pub client_payment_verified: bool,
    pub client_history: Vec<String>,
}

impl Default for UpworkParams {
    fn default() -> Self {
        apply_fixed_overrides(Self {
            keywords: None,
            experience_level: None,
            budget: None,
            numbers_of_proposals: None,
            project_length: None,
            hours_per_week: None,
            contract_to_hire_role: None,
            limit: 0,
            sortby: String::new(),
            client_payment_verified: false,
            client_history: Vec::new(),
        })
    }
}

fn validate_budget(raw: &Map<String, Value>) -> Option<UpworkBudget> {
    let mut budget = UpworkBudget::default();

    if read_bool(raw, "hourly") == Some(true) {
        budget.hourly = Some(true);
        budget.min_budget_hourly = read_number(raw, "min_budget_hourly");
        budget.max_budget_hourly = read_number(raw, "max_budget_hourly");
    }
    if read_bool(raw, "fixed_price") == Some(true) {
        budget.fixed_price = Some(true);
        budget.min_budget_fixed_price = read_number(raw, "min_budget_fixed_price");
        budget.max_budget_fixed_price = read_number(raw, "max_budget_fixed_price");
    }

    (!budget.is_empty()).then_some(budget)
}

/// Validate the model's parameter object; `keywords` is the already-augmented string.
pub fn validate_params(raw: &Map<String, Value>, keywords: String) -> UpworkParams {
    UpworkParams {
        keywords: Some(keywords.trim().to_string()).filter(|k| !k.is_empty()),
        experience_level: read_enum_array(raw, "experience_level", EXPERIENCE_LEVELS),
        budget: read_object(raw, "budget").and_then(validate_budget),
        numbers_of_proposals: read_enum_array(raw, "numbers_of_proposals", PROPOSAL_BUCKETS),
        project_length: read_enum_array(raw, "project_length", PROJECT_LENGTHS),
        hours_per_week: read_enum_array(raw, "hours_per_week", HOURS_PER_WEEK),
        contract_to_hire_role: read_bool(raw, "contract_to_hire_role"),
        ..UpworkParams::default()
    }
}

pub fn apply_fixed_overrides(mut params: UpworkParams) -> UpworkParams {
    params.limit = FIXED_LIMIT;
    params.sortby = FIXED_SORT.to_string();
    params.client_payment_verified = true;
    params.client_history = FIXED_CLIENT_HISTORY.iter().map(|s| s.to_string()).collect();
    params
}

pub fn from_model_output(
    output: &Map<String, Value>,
    input: QueryInput<'_>,
) -> Result<Vec<GeneratedQuery<UpworkParams>>, GenerationError> {
    let queries = output
        .get("queries")
        .and_then(Value::as_array)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| GenerationError::InvalidShape("missing queries array".to_string()))?;

    let empty = Map::new();
    Ok(queries
        .iter()
        .enumerate()
        .map(|(i, query)| {
            let query = query.as_object().unwrap_or(&empty);
            let raw = read_object(query, "params").unwrap_or(&empty);
            let model_keywords = raw.get("keywords").and_then(Value::as_str);
            let keywords = augment_keywords(input.query, input.profile, model_keywords);
            if model_keywords != Some(keywords.as_str()) {
                debug!("Upwork keywords augmented: {:?} -> {}", model_keywords, keywords);
            }

            GeneratedQuery {
                description: read_string(query, "description")
                    .unwrap_or_else(|| format!("Upwork Search {}", i + 1)),
                relevance_score: read_number(query, "relevanceScore").unwrap_or(5.0),
                reasoning: read_string(query, "reasoning")
                    .unwrap_or_else(|| "No reasoning provided".to_string()),
                params: apply_fixed_overrides(validate_params(raw, keywords)),
            }
        })
        .collect())
}

pub async fn generate(
    llm: &dyn LanguageModel,
    input: QueryInput<'_>,
) -> Result<Vec<GeneratedQuery<UpworkParams>>, GenerationError> {
    let user_prompt = match input.profile {
        Some(_) => format!(
            "User Query: \"{}\"\n\n{}\n\nGenerate 1 optimized Upwork search query based on the query and profile.",
            input.query,
            input.profile_block()
        ),
        None => format!(
            "User Query: \"{}\"\n\nNo user profile available. Generate 1 optimized Upwork search query based on the query alone.",
            input.query
        ),
    };

    let output = complete_json(llm, SYSTEM_PROMPT, &user_prompt, GENERATION_TEMPERATURE).await?;
    from_model_output(&output, input)
}

const SYSTEM_PROMPT: &str = r#"You create Upwork job search queries for a job search API.

Read the user's request and profile (if any) and produce one targeted search.

## Parameters

keywords (string, required)
- ONE string of 10-18 distinct keywords separated by spaces, not commas.
- Mix job roles, tools and technologies, and domain terms.
- When a profile is given, pull extra keywords from it: titles, industries, certifications, education.
- Avoid filler words such as "job", "freelance" or "remote" unless the user asked for them.

experience_level (array, optional): "entry_level", "intermediate", "expert"

budget (object, optional, only when the user mentions rates):
- hourly (boolean), min_budget_hourly, max_budget_hourly (numbers)
- fixed_price (boolean), min_budget_fixed_price, max_budget_fixed_price (numbers)

numbers_of_proposals (array, optional): "less_than_5", "5_to_10", "10_to_15", "15_to_20", "20_to_50"

project_length (array, optional): "less_than_1_month", "1_to_3_months", "3_to_6_months", "more_than_6_months"

hours_per_week (array, optional): "less_than_30", "more_than_30"

contract_to_hire_role (boolean, optional): only when the user wants long-term employment.

## Guidelines
1. Combine the query intent with profile-derived skills and domain terms.
2. "$50/hr" or "at least $40" become budget filters.
3. Experience: 0-2 years entry_level, 2-5 intermediate, 5+ expert.
4. Only include filters that are mentioned or clearly implied.

## Response format
{
  "queries": [
    {
      "description": "Human-readable description of this search",
      "params": { "keywords": "..." },
      "relevanceScore": 8,
      "reasoning": "Why this query was created"
    }
  ]
}
Do not include empty arrays or unnecessary filters."#;
