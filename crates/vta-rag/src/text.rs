//! Text cleanup helpers for scraped posts and course pages

use regex::Regex;
use scraper::Html;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static SPECIAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\.\?\!\,\-\(\)]").expect("valid regex"));
static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```[\s\S]*?```").expect("valid regex"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]+`").expect("valid regex"));

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see",
    "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use",
];

/// Cleanup helpers for the scraper that produces the raw post and course
/// content files. The loader consumes those files as they are.
pub struct TextProcessor;

impl TextProcessor {
    /// Visible text of an HTML document, script and style removed, whitespace collapsed
    pub fn clean_html(html: &str) -> String {
        if html.is_empty() {
            return String::new();
        }

        let document = Html::parse_document(html);
        let mut raw = String::new();
        for node in document.tree.root().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| matches!(el.name(), "script" | "style"))
            });
            if !hidden {
                raw.push_str(text);
            }
        }

        WHITESPACE.replace_all(&raw, " ").trim().to_string()
    }

    /// Normalize text for matching: entities decoded, markup dropped,
    /// whitespace collapsed, unusual punctuation blanked out
    pub fn preprocess_text(text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let fragment = Html::parse_fragment(text);
        let decoded: String = fragment.root_element().text().collect();
        let collapsed = WHITESPACE.replace_all(&decoded, " ");
        let cleaned = SPECIAL_CHARS.replace_all(&collapsed, " ");
        cleaned.trim().to_string()
    }

    /// Fenced code blocks first, then inline code spans
    pub fn extract_code_blocks(text: &str) -> Vec<String> {
        FENCED_CODE
            .find_iter(text)
            .chain(INLINE_CODE.find_iter(text))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Distinct lowercase alphabetic words of at least `min_length` letters,
    /// stop words removed, sorted
    pub fn extract_keywords(text: &str, min_length: usize) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let pattern = format!(r"\b[a-zA-Z]{{{},}}\b", min_length.max(1));
        let Ok(words) = Regex::new(&pattern) else {
            return Vec::new();
        };

        let lowered = text.to_lowercase();
        words
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| !STOP_WORDS.contains(word))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
