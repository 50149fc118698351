//! Bounded context assembly for the answer composer

use vta_core::{AssembledContext, ContextConfig, Document, DocumentKind, Result};

use crate::index::VectorIndex;

const ELLIPSIS: &str = "...";
const BLOCK_SEPARATOR: &str = "\n\n";

impl VectorIndex {
    /// Rank documents for `query` and pack as many formatted blocks as fit
    /// into `config.max_length` characters, in rank order.
    ///
    /// Packing stops at the first block that does not fit. The returned
    /// results include everything the ranker found, packed or not.
    pub async fn assemble_context(&self, query: &str, config: ContextConfig) -> Result<AssembledContext> {
        let results = self.search(query, config.search_config()).await?;

        let blocks = results
            .iter()
            .map(|result| format_block(&result.document, config.excerpt_chars));
        let (text, blocks_included) = pack_blocks(blocks, config.max_length);

        Ok(AssembledContext {
            text,
            results,
            blocks_included,
        })
    }
}

/// Format one document as a context block, one field per line
pub fn format_block(document: &Document, excerpt_chars: usize) -> String {
    let excerpt = excerpt(&document.content, excerpt_chars);
    match &document.kind {
        DocumentKind::ForumPost { author, .. } => format!(
            "Forum Post - {}\nUser: {}\nContent: {}\nURL: {}",
            document.title, author, excerpt, document.url
        ),
        DocumentKind::CourseContent { .. } => format!(
            "Course Content - {}\nContent: {}\nURL: {}",
            document.title, excerpt, document.url
        ),
    }
}

/// First `max_chars` characters of `content`, with `...` only when cut
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{}", &content[..end], ELLIPSIS),
        None => content.to_string(),
    }
}

/// Join blocks with blank lines while the total stays within `max_length`
/// characters. Returns the text and how many blocks made it in.
pub fn pack_blocks<I>(blocks: I, max_length: usize) -> (String, usize)
where
    I: IntoIterator<Item = String>,
{
    let separator_len = BLOCK_SEPARATOR.chars().count();
    let mut text = String::new();
    let mut length = 0;
    let mut included = 0;

    for block in blocks {
        let added = block.chars().count() + if included > 0 { separator_len } else { 0 };
        if length + added > max_length {
            break;
        }
        if included > 0 {
            text.push_str(BLOCK_SEPARATOR);
        }
        text.push_str(&block);
        length += added;
        included += 1;
    }

    (text, included)
}
