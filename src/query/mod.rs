// src/query/mod.rs
//! Turns a free-text query plus an optional profile summary into validated,
//! platform-specific search parameters.
//!
//! Every generator follows the same three steps: prompt the model, validate
//! its JSON into a fully-defaulted typed struct, then `apply_fixed_overrides`
//! as the last write so platform-fixed values can never come from the model.

pub mod behance;
pub mod freelance;
pub mod indeed;
pub mod keywords;
pub mod linkedin;
pub mod upwork;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::llm::{CompletionRequest, LanguageModel, LlmError};
use crate::platform::Platform;
use crate::profile::ProfileSummary;

pub use behance::BehanceParams;
pub use freelance::FreelanceParams;
pub use indeed::IndeedParams;
pub use linkedin::LinkedInParams;
pub use upwork::UpworkParams;

pub(crate) const GENERATION_TEMPERATURE: f32 = 0.7;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("No response from language model")]
    EmptyResponse,

    #[error("Language model returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid response format: {0}")]
    InvalidShape(String),
}

/// One model-proposed search, already validated and overridden.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuery<P> {
    pub description: String,
    pub relevance_score: f64,
    pub reasoning: String,
    pub params: P,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "platform", content = "generated", rename_all = "lowercase")]
pub enum PlatformQuery {
    LinkedIn(Vec<GeneratedQuery<LinkedInParams>>),
    Upwork(Vec<GeneratedQuery<UpworkParams>>),
    Indeed(GeneratedQuery<IndeedParams>),
    Behance(GeneratedQuery<BehanceParams>),
    Freelance(GeneratedQuery<FreelanceParams>),
}

impl PlatformQuery {
    pub fn platform(&self) -> Platform {
        match self {
            PlatformQuery::LinkedIn(_) => Platform::LinkedIn,
            PlatformQuery::Upwork(_) => Platform::Upwork,
            PlatformQuery::Indeed(_) => Platform::Indeed,
            PlatformQuery::Behance(_) => Platform::Behance,
            PlatformQuery::Freelance(_) => Platform::Freelance,
        }
    }

    /// Human-readable description of the first (primary) query.
    pub fn primary_description(&self) -> &str {
        match self {
            PlatformQuery::LinkedIn(q) => q.first().map_or("", |q| q.description.as_str()),
            PlatformQuery::Upwork(q) => q.first().map_or("", |q| q.description.as_str()),
            PlatformQuery::Indeed(q) => &q.description,
            PlatformQuery::Behance(q) => &q.description,
            PlatformQuery::Freelance(q) => &q.description,
        }
    }
}

/// What every generator receives.
#[derive(Debug, Clone, Copy)]
pub struct QueryInput<'a> {
    pub query: &'a str,
    pub profile: Option<&'a ProfileSummary>,
}

impl<'a> QueryInput<'a> {
    pub fn new(query: &'a str, profile: Option<&'a ProfileSummary>) -> Self {
        Self {
            query,
            profile: profile.filter(|p| !p.is_empty()),
        }
    }

    /// Profile as pretty JSON for prompts, or a marker line when absent.
    pub fn profile_block(&self) -> String {
        self.profile
            .and_then(|p| serde_json::to_string_pretty(p).ok())
            .map(|json| format!("## User's Profile\n{}", json))
            .unwrap_or_else(|| "## No profile data provided".to_string())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub linkedin_query_count: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            linkedin_query_count: 1,
        }
    }
}

/// Run a JSON-mode completion and parse the top-level object.
pub async fn complete_json(
    llm: &dyn LanguageModel,
    system: &str,
    user: &str,
    temperature: f32,
) -> Result<Map<String, Value>, GenerationError> {
    let content = llm
        .complete(CompletionRequest::json(system, user, temperature))
        .await?
        .ok_or(GenerationError::EmptyResponse)?;

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        error!("Language model returned unparseable content: {}", e);
        GenerationError::InvalidJson(e.to_string())
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(GenerationError::InvalidShape(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub async fn generate_query(
    llm: &dyn LanguageModel,
    platform: Platform,
    input: QueryInput<'_>,
    options: GenerationOptions,
) -> Result<PlatformQuery, GenerationError> {
    info!("Generating {} search query for: {}", platform, input.query);

    let generated = match platform {
        Platform::LinkedIn => {
            PlatformQuery::LinkedIn(linkedin::generate(llm, input, options.linkedin_query_count).await?)
        }
        Platform::Upwork => PlatformQuery::Upwork(upwork::generate(llm, input).await?),
        Platform::Indeed => PlatformQuery::Indeed(indeed::generate(llm, input).await?),
        Platform::Behance => PlatformQuery::Behance(behance::generate(llm, input).await?),
        Platform::Freelance => PlatformQuery::Freelance(freelance::generate(llm, input).await?),
    };

    info!("Generated {} query: {}", platform, generated.primary_description());
    Ok(generated)
}

// Lenient readers for untrusted model output.

pub(crate) fn read_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn read_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

pub(crate) fn read_number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

/// Trimmed non-blank strings of an array field; anything else yields nothing.
pub(crate) fn read_string_array(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Array restricted to a closed vocabulary; `None` when nothing valid remains.
pub(crate) fn read_enum_array(
    map: &Map<String, Value>,
    key: &str,
    allowed: &[&str],
) -> Option<Vec<String>> {
    let values: Vec<String> = read_string_array(map, key)
        .into_iter()
        .filter(|v| allowed.contains(&v.as_str()))
        .collect();
    (!values.is_empty()).then_some(values)
}

pub(crate) fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

pub(crate) fn read_object<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use serde_json::json;

    #[tokio::test]
    async fn test_complete_json_empty_content() {
        let llm = ScriptedModel::empty();
        let result = complete_json(&llm, "s", "u", 0.7).await;
        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_complete_json_invalid_json() {
        let llm = ScriptedModel::raw("not json {");
        let result = complete_json(&llm, "s", "u", 0.7).await;
        assert!(matches!(result, Err(GenerationError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_complete_json_requires_object() {
        let llm = ScriptedModel::json(json!([1, 2]));
        let result = complete_json(&llm, "s", "u", 0.7).await;
        assert!(matches!(result, Err(GenerationError::InvalidShape(_))));
    }

    #[test]
    fn test_read_helpers() {
        let value = json!({
            "a": ["  x ", "", 3, "y"],
            "b": "  ",
            "c": ["Remote OK", "Sometimes"],
            "d": 12.5
        });
        let map = value.as_object().unwrap();
        assert_eq!(read_string_array(map, "a"), vec!["x", "y"]);
        assert_eq!(read_string(map, "b"), None);
        assert_eq!(
            read_enum_array(map, "c", &["Remote OK"]),
            Some(vec!["Remote OK".to_string()])
        );
        assert_eq!(read_enum_array(map, "a", &["z"]), None);
        assert_eq!(read_number(map, "d"), Some(12.5));
    }

    #[test]
    fn test_query_input_drops_empty_profile() {
        let empty = ProfileSummary::default();
        let input = QueryInput::new("rust", Some(&empty));
        assert!(input.profile.is_none());
        assert_eq!(input.profile_block(), "## No profile data provided");
    }
}
