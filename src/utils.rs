// src/utils.rs
use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Keep at most `max` characters (not bytes) of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Treat blank strings as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Borrowing variant of [`non_blank`].
pub fn non_blank_str(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Words of the raw query longer than two characters, in order, capped at `max`.
pub fn query_terms(query: &str, max: usize) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Order-preserving dedup keyed by the lower-cased value. The first spelling wins.
pub fn dedup_case_insensitive<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(Into::into)
        .filter(|item: &String| !item.trim().is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

fn markdown_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#{1,6}\s*").expect("header regex must compile"))
}

/// Strip HTML tags and decode entities, keeping only the text nodes.
pub fn strip_html(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }
    let fragment = Html::parse_fragment(text);
    fragment.root_element().text().collect::<Vec<_>>().concat()
}

/// Remove markdown headers, emphasis markers and escaped dashes, then HTML tags.
pub fn strip_markup(text: &str) -> String {
    let without_headers = markdown_header_re().replace_all(text, "");
    let plain = without_headers
        .replace("**", "")
        .replace('*', "")
        .replace("\\-", "-");
    strip_html(&plain)
}

/// Display-ready description: markup stripped, length capped.
pub fn sanitize_description(text: &str, max_chars: usize) -> String {
    truncate_chars(strip_markup(text).trim(), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_query_terms() {
        assert_eq!(
            query_terms("a UX designer in Berlin now", 3),
            vec!["designer", "Berlin", "now"]
        );
        assert!(query_terms("a b", 3).is_empty());
    }

    #[test]
    fn test_dedup_case_insensitive() {
        let deduped = dedup_case_insensitive(vec!["Python", "python", "Rust", " ", "PYTHON"]);
        assert_eq!(deduped, vec!["Python", "Rust"]);
    }

    #[test]
    fn test_strip_markup() {
        let raw = "## About\n**Great** role \\- apply <b>now</b> &amp; grow";
        assert_eq!(strip_markup(raw), "About\nGreat role - apply now & grow");
    }

    #[test]
    fn test_sanitize_description_caps_length() {
        let long = "x".repeat(800);
        assert_eq!(sanitize_description(&long, 500).len(), 500);
    }
}
