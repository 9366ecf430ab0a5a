// src/query/behance.rs
use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    complete_json, read_number, read_string, GeneratedQuery, GenerationError, QueryInput,
    GENERATION_TEMPERATURE,
};
use crate::llm::LanguageModel;

const DEFAULT_KEYWORD: &str = "graphic designer";
const MAX_KEYWORD_WORDS: usize = 3;
const FIXED_MAX_ITEMS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehanceParams {
    pub keyword: String,
    pub maxitems: u32,
}

/// Trimmed, lower-cased keyword of at most three words.
pub fn clean_keyword(raw: Option<&str>) -> String {
    let words: Vec<String> = raw
        .unwrap_or_default()
        .split_whitespace()
        .take(MAX_KEYWORD_WORDS)
        .map(str::to_lowercase)
        .collect();

    if words.is_empty() {
        DEFAULT_KEYWORD.to_string()
    } else {
        words.join(" ")
    }
}

pub fn apply_fixed_overrides(mut params: BehanceParams) -> BehanceParams {
    params.maxitems = FIXED_MAX_ITEMS;
    params
}

/// A missing or empty keyword falls back to the user's query before cleaning.
pub fn from_model_output(
    output: &Map<String, Value>,
    input: QueryInput<'_>,
) -> GeneratedQuery<BehanceParams> {
    let raw = output
        .get("keyword")
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
        .unwrap_or(input.query);
    let keyword = clean_keyword(Some(raw));

    GeneratedQuery {
        description: read_string(output, "description")
            .unwrap_or_else(|| format!("Search for {} jobs on Behance", keyword)),
        relevance_score: read_number(output, "relevanceScore")
            .filter(|s| *s != 0.0)
            .unwrap_or(7.0),
        reasoning: read_string(output, "reasoning")
            .unwrap_or_else(|| "Generated from user query and profile".to_string()),
        params: apply_fixed_overrides(BehanceParams {
            keyword,
            maxitems: FIXED_MAX_ITEMS,
        }),
    }
}

pub async fn generate(
    llm: &dyn LanguageModel,
    input: QueryInput<'_>,
) -> Result<GeneratedQuery<BehanceParams>, GenerationError> {
    let user_prompt = match input.profile {
        Some(_) => format!(
            "User Query: \"{}\"\n\n{}\n\nGenerate the best Behance search keyword based on the query and profile. Focus on creative and design roles.",
            input.query,
            input.profile_block()
        ),
        None => format!(
            "User Query: \"{}\"\n\nNo user profile available. Generate the best Behance search keyword based on the query alone. Focus on creative and design roles.",
            input.query
        ),
    };

    let output = complete_json(llm, SYSTEM_PROMPT, &user_prompt, GENERATION_TEMPERATURE).await?;
    Ok(from_model_output(&output, input))
}

const SYSTEM_PROMPT: &str = r#"You pick a search keyword for Behance Jobs.

Behance lists creative roles: graphic, UI/UX, brand and web designers, illustrators, motion designers, animators, 3D artists, art and creative directors, video editors, photographers.

## Task
Produce one short keyword (1-3 words) for the user's request and profile.

## Guidelines
1. Use common Behance title formats such as "graphic designer", "UI designer", "motion designer".
2. For non-creative requests pick the closest creative equivalent ("frontend developer" becomes "web designer").
3. Lean on the user's creative background when a profile is given.

## Examples
"I want a design job" -> "graphic designer"
"Looking for UX work" -> "UX designer"
"Video editing jobs" -> "video editor"
"Animation work" -> "motion designer"

## Response format
{
  "description": "Brief description of this search",
  "keyword": "the search keyword",
  "relevanceScore": 8,
  "reasoning": "Why this keyword was chosen"
}"#;
