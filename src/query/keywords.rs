// src/query/keywords.rs
//! Upwork keyword augmentation: the model's keyword string is rebuilt from its
//! own tokens, the raw query and profile-derived terms.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::profile::ProfileSummary;

pub const MAX_KEYWORDS: usize = 18;
const MIN_TOKEN_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "or", "the", "to", "for", "with", "my", "me", "find", "job", "jobs", "work",
    "role", "position", "month", "months", "less", "than", "more", "need", "looking", "search",
    "freelance", "freelancer",
];

/// Discovery terms added when every trigger appears in the collected tokens.
const INFERENCE_RULES: &[(&[&str], &[&str])] = &[
    (&["adyen"], &["Payments", "FinTech"]),
    (&["monitoring"], &["Observability", "SRE"]),
    (&["data", "science"], &["Python", "MachineLearning"]),
    (&["smart", "contract"], &["Solidity", "Blockchain", "Web3"]),
];

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[,/|]+").expect("separator regex must compile"))
}

fn tokenize(text: &str) -> Vec<String> {
    separator_re()
        .replace_all(text, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '+' | '.' | '#'))
        .collect()
}

/// Ordered token set keyed case-insensitively.
#[derive(Default)]
struct TokenSet {
    seen: HashSet<String>,
    tokens: Vec<String>,
}

impl TokenSet {
    fn add_text(&mut self, text: &str) {
        for raw in tokenize(text) {
            self.add(&raw);
        }
    }

    fn add(&mut self, raw: &str) {
        let token = normalize_token(raw);
        let lower = token.to_lowercase();
        if lower.chars().count() < MIN_TOKEN_CHARS || STOPWORDS.contains(&lower.as_str()) {
            return;
        }
        if self.seen.insert(lower) {
            self.tokens.push(token);
        }
    }

    fn inferred(&self) -> Vec<&'static str> {
        let joined = self.tokens.join(" ").to_lowercase();
        INFERENCE_RULES
            .iter()
            .filter(|(triggers, _)| triggers.iter().all(|t| joined.contains(t)))
            .flat_map(|(_, added)| added.iter().copied())
            .collect()
    }
}

/// Build the final keyword string: model tokens, then query tokens, then
/// profile terms, then inferred terms, capped at [`MAX_KEYWORDS`].
pub fn augment_keywords(
    query: &str,
    profile: Option<&ProfileSummary>,
    model_keywords: Option<&str>,
) -> String {
    let mut set = TokenSet::default();

    set.add_text(model_keywords.unwrap_or_default());
    set.add_text(query);
    if let Some(profile) = profile {
        for source in profile.keyword_sources() {
            set.add_text(&source);
        }
    }

    for term in set.inferred() {
        set.add(term);
    }

    set.tokens
        .into_iter()
        .take(MAX_KEYWORDS)
        .collect::<Vec<_>>()
        .join(" ")
}
