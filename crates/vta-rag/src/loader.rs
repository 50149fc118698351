//! Normalizes forum posts and course content into one document sequence

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use vta_core::{Document, DocumentKind};

/// Loads raw records into [`Document`]s.
///
/// Nothing here fails: unreadable sources contribute no documents, missing
/// fields take defaults, and records with blank content are dropped.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load forum posts (and optionally course content) from JSON array files
    pub fn load_files(posts_file: &Path, content_file: Option<&Path>) -> Vec<Document> {
        let posts = Self::read_records(posts_file).unwrap_or_default();
        let content = content_file.map(|path| Self::read_records(path).unwrap_or_default());
        Self::load_records(&posts, content.as_deref())
    }

    /// Load from already materialized records. Forum posts come first.
    pub fn load_records(posts: &[Value], content: Option<&[Value]>) -> Vec<Document> {
        let mut documents: Vec<Document> = posts.iter().filter_map(Self::forum_post).collect();
        let post_count = documents.len();

        if let Some(items) = content {
            documents.extend(items.iter().filter_map(Self::course_item));
        }

        debug!(
            "Loaded {} forum posts and {} course items",
            post_count,
            documents.len() - post_count
        );
        documents
    }

    fn read_records(path: &Path) -> Option<Vec<Value>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping source {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("Skipping source {}: not a JSON array of records ({})", path.display(), e);
                None
            }
        }
    }

    fn forum_post(record: &Value) -> Option<Document> {
        let content = str_field(record, "raw_content");
        if content.trim().is_empty() {
            return None;
        }

        let author = match str_field(record, "username") {
            name if name.is_empty() => "Unknown".to_string(),
            name => name,
        };

        Some(Document {
            title: str_field(record, "topic_title"),
            content,
            url: str_field(record, "topic_url"),
            kind: DocumentKind::ForumPost {
                author,
                created_at: str_field(record, "created_at"),
                post_number: u64_field(record, "post_number").unwrap_or(1),
                like_count: u64_field(record, "like_count").unwrap_or(0),
            },
        })
    }

    fn course_item(record: &Value) -> Option<Document> {
        let content = str_field(record, "content");
        if content.trim().is_empty() {
            return None;
        }

        Some(Document {
            title: str_field(record, "title"),
            content,
            url: str_field(record, "url"),
            kind: DocumentKind::CourseContent {
                section: str_field(record, "section"),
            },
        })
    }
}

fn str_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn u64_field(record: &Value, key: &str) -> Option<u64> {
    record.get(key).and_then(Value::as_u64)
}
