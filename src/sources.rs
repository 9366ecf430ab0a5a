// src/sources.rs
//! Language-model choice of which job platforms to search.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::llm::LanguageModel;
use crate::platform::Platform;
use crate::query::{complete_json, read_string, GenerationError, QueryInput};

const SELECTION_TEMPERATURE: f32 = 0.3;
const FALLBACK_NOTE: &str = " (Fallback: enabled LinkedIn and Indeed as no platforms were selected)";
const ERROR_REASONING: &str = "Default selection due to error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSelection {
    pub linkedin: bool,
    pub behance: bool,
    pub indeed: bool,
    pub freelance: bool,
    pub upwork: bool,
    pub reasoning: String,
}

impl SourceSelection {
    /// Every platform enabled.
    pub fn all(reasoning: impl Into<String>) -> Self {
        Self {
            linkedin: true,
            behance: true,
            indeed: true,
            freelance: true,
            upwork: true,
            reasoning: reasoning.into(),
        }
    }

    pub fn is_selected(&self, platform: Platform) -> bool {
        match platform {
            Platform::LinkedIn => self.linkedin,
            Platform::Upwork => self.upwork,
            Platform::Indeed => self.indeed,
            Platform::Behance => self.behance,
            Platform::Freelance => self.freelance,
        }
    }

    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.is_selected(*p))
            .collect()
    }

    /// Validate the model's flags; forces LinkedIn and Indeed on when nothing is selected.
    pub fn from_model_output(output: &Map<String, Value>) -> Self {
        let flag = |key: &str, default: bool| output.get(key).and_then(truthy).unwrap_or(default);

        let mut selection = Self {
            linkedin: flag("linkedin", true),
            behance: flag("behance", false),
            indeed: flag("indeed", true),
            freelance: flag("freelance", false),
            upwork: flag("upwork", false),
            reasoning: read_string(output, "reasoning")
                .unwrap_or_else(|| "AI-selected platforms based on query".to_string()),
        };

        if selection.platforms().is_empty() {
            selection.linkedin = true;
            selection.indeed = true;
            selection.reasoning.push_str(FALLBACK_NOTE);
        }
        selection
    }
}

/// Loose truthiness for model flags; `null` counts as absent.
fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan())),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    }
}

pub async fn select_sources(
    llm: &dyn LanguageModel,
    input: QueryInput<'_>,
) -> Result<SourceSelection, GenerationError> {
    let user_prompt = match input.profile {
        Some(_) => format!(
            "User Query: \"{}\"\n\n{}\n\nBased on the query and profile, which platforms should we search?",
            input.query,
            input.profile_block()
        ),
        None => format!(
            "User Query: \"{}\"\n\nNo user profile available. Based on the query alone, which platforms should we search?",
            input.query
        ),
    };

    let output = complete_json(llm, SYSTEM_PROMPT, &user_prompt, SELECTION_TEMPERATURE).await?;
    let selection = SourceSelection::from_model_output(&output);
    info!(
        "Selected platforms {:?}: {}",
        selection.platforms(),
        selection.reasoning
    );
    Ok(selection)
}

/// Selection that never fails: any error enables every platform.
pub async fn select_sources_or_default(
    llm: &dyn LanguageModel,
    input: QueryInput<'_>,
) -> SourceSelection {
    match select_sources(llm, input).await {
        Ok(selection) => selection,
        Err(e) => {
            warn!("Source selection failed, searching every platform: {}", e);
            SourceSelection::all(ERROR_REASONING)
        }
    }
}

const SYSTEM_PROMPT: &str = r#"You decide which job platforms are relevant for a user's search.

## Platforms
1. LinkedIn: corporate and professional jobs at every level, executive positions, full-time employment, enterprise companies, management roles.
2. Indeed: a wide range of jobs from entry level to senior, full-time and part-time, local and hourly positions, healthcare, retail, hospitality, manufacturing.
3. Behance: creative and design roles only (graphic, UI/UX, brand, web and motion designers, illustrators, art directors, video editors, 3D artists, animators).
4. Upwork: freelance and contract work, short-term projects, remote gigs, technical freelancing. Not for full-time employment or executive roles.
5. Freelance.com: freelance projects and contests for budget-conscious clients. Not for traditional employment or senior roles.

## Rules
- Executive roles (CEO, CFO, VP, Director): LinkedIn and Indeed only.
- Traditional full-time employment: LinkedIn and Indeed, no freelance platforms.
- Creative roles: include Behance.
- Freelance or contract explicitly mentioned: include Upwork and Freelance.com.
- "remote" or "flexible": consider the freelance platforms too.
- Broad queries: select more platforms. Specific queries: be selective.

## Response format
{
  "linkedin": true,
  "behance": false,
  "indeed": true,
  "freelance": false,
  "upwork": false,
  "reasoning": "Brief explanation of why these platforms were selected"
}
At least one platform must be true."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use serde_json::json;

    fn selection(value: Value) -> SourceSelection {
        SourceSelection::from_model_output(value.as_object().unwrap())
    }

    #[test]
    fn test_all_false_falls_back_to_linkedin_and_indeed() {
        let s = selection(json!({
            "linkedin": false, "behance": false, "indeed": false,
            "freelance": false, "upwork": false, "reasoning": "nothing fits"
        }));
        assert!(s.platforms().len() >= 2);
        assert!(s.linkedin && s.indeed);
        assert!(s.reasoning.contains("Fallback"));
        assert!(s.reasoning.starts_with("nothing fits"));
    }

    #[test]
    fn test_missing_flags_use_defaults() {
        let s = selection(json!({ "behance": true }));
        assert_eq!(
            s.platforms(),
            vec![Platform::LinkedIn, Platform::Indeed, Platform::Behance]
        );
        assert_eq!(s.reasoning, "AI-selected platforms based on query");
    }

    #[test]
    fn test_loose_flag_values() {
        let s = selection(json!({
            "linkedin": 0, "indeed": "", "upwork": "yes", "freelance": 1, "behance": null
        }));
        assert_eq!(s.platforms(), vec![Platform::Upwork, Platform::Freelance]);
    }

    #[tokio::test]
    async fn test_select_uses_low_temperature() {
        let llm = ScriptedModel::json(json!({ "upwork": true, "reasoning": "freelance" }));
        let s = select_sources(&llm, QueryInput::new("freelance rust", None)).await.unwrap();
        assert!(s.upwork);
        assert_eq!(llm.last_request().unwrap().temperature, 0.3);
    }

    #[tokio::test]
    async fn test_failure_selects_everything() {
        let llm = ScriptedModel::raw("{broken");
        let s = select_sources_or_default(&llm, QueryInput::new("anything", None)).await;
        assert_eq!(s.platforms().len(), 5);
        assert_eq!(s.reasoning, "Default selection due to error");
    }
}
