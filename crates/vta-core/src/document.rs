//! Document model shared by the loader, index and context assembler

use serde::{Deserialize, Serialize};

/// A single retrievable document.
///
/// Documents are identified by their position in the loaded sequence; the
/// embedding matrix row at the same position belongs to this document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub url: String,
    #[serde(flatten)]
    pub kind: DocumentKind,
}

/// Source-specific metadata, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentKind {
    ForumPost {
        author: String,
        created_at: String,
        post_number: u64,
        like_count: u64,
    },
    CourseContent {
        section: String,
    },
}

impl Document {
    pub fn forum_post(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
            kind: DocumentKind::ForumPost {
                author: author.into(),
                created_at: String::new(),
                post_number: 1,
                like_count: 0,
            },
        }
    }

    pub fn course_content(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
            kind: DocumentKind::CourseContent {
                section: section.into(),
            },
        }
    }

    /// Text fed to the embedding model: title first, then content.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            DocumentKind::ForumPost { .. } => "forum_post",
            DocumentKind::CourseContent { .. } => "course_content",
        }
    }

    pub fn is_forum_post(&self) -> bool {
        matches!(self.kind, DocumentKind::ForumPost { .. })
    }
}
