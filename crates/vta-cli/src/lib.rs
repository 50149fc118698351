//! CLI interface for the VTA virtual teaching assistant

mod links;
mod ui;

#[cfg(test)]
mod tests;

pub use links::{AnswerPayload, DEFAULT_LINK_COUNT, LINK_TEXT_CHARS, SupportingLink, supporting_links};
pub use ui::{
    describe_source, display_banner, format_post_date, read_question, render_links, render_results,
};

// Re-export core types
pub use vta_core::{Error, Result};
