//! Supporting links handed back alongside the context

use serde::{Deserialize, Serialize};
use vta_core::{AssembledContext, SimilarityResult};

/// Characters of post content shown as link text
pub const LINK_TEXT_CHARS: usize = 100;

/// Links attached to an answer by default
pub const DEFAULT_LINK_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingLink {
    pub url: String,
    pub text: String,
}

/// What the answer composer receives for one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub question: String,
    pub context: String,
    pub links: Vec<SupportingLink>,
}

impl AnswerPayload {
    pub fn new(question: &str, assembled: &AssembledContext) -> Self {
        Self {
            question: question.to_string(),
            context: assembled.text.clone(),
            links: supporting_links(&assembled.results, DEFAULT_LINK_COUNT),
        }
    }
}

/// Links for the top `count` results, skipping results without a url
pub fn supporting_links(results: &[SimilarityResult], count: usize) -> Vec<SupportingLink> {
    results
        .iter()
        .filter(|result| !result.document.url.is_empty())
        .take(count)
        .map(|result| SupportingLink {
            url: result.document.url.clone(),
            text: link_text(&result.document.content),
        })
        .collect()
}

fn link_text(content: &str) -> String {
    match content.char_indices().nth(LINK_TEXT_CHARS) {
        Some((end, _)) => format!("{}...", &content[..end]),
        None => content.to_string(),
    }
}
