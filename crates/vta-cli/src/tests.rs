//! Tests for links and result rendering helpers

#[cfg(test)]
mod snapshot_tests {
    use crate::{AnswerPayload, describe_source, format_post_date, supporting_links};
    use insta::assert_yaml_snapshot;
    use vta_core::{AssembledContext, Document, DocumentKind, SimilarityResult};

    fn result(document: Document, rank: usize) -> SimilarityResult {
        SimilarityResult {
            document,
            similarity: 0.5,
            index: rank - 1,
            rank,
        }
    }

    #[test]
    fn test_supporting_links_snapshot() {
        let long = format!("My understanding is that you just have to use a tokenizer {}", "x".repeat(80));
        let results = vec![
            result(
                Document::forum_post("GA5", "Use the model that's mentioned in the question.", "https://forum/t/155939/4", "ta"),
                1,
            ),
            result(Document::forum_post("Tokens", long, "https://forum/t/155939/3", "ta"), 2),
            result(Document::forum_post("Third", "ignored", "https://forum/t/3", "ta"), 3),
        ];

        let links = supporting_links(&results, 2);

        assert_yaml_snapshot!(links, @r###"
        - url: "https://forum/t/155939/4"
          text: "Use the model that's mentioned in the question."
        - url: "https://forum/t/155939/3"
          text: My understanding is that you just have to use a tokenizer xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx...
        "###);
    }

    #[test]
    fn test_links_skip_documents_without_url() {
        let results = vec![
            result(Document::course_content("No url", "content", "", "Week 1"), 1),
            result(Document::course_content("Docker", "content", "https://tds/docker", "Week 2"), 2),
        ];
        let links = supporting_links(&results, 2);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://tds/docker");
    }

    #[test]
    fn test_answer_payload_uses_context_and_top_links() {
        let assembled = AssembledContext {
            text: "Forum Post - GA5".to_string(),
            results: vec![result(Document::forum_post("GA5", "short", "https://forum/t/1", "ta"), 1)],
            blocks_included: 1,
        };
        let payload = AnswerPayload::new("which model?", &assembled);
        assert_eq!(payload.context, "Forum Post - GA5");
        assert_eq!(payload.links.len(), 1);
        assert_eq!(payload.links[0].text, "short");
    }

    #[test]
    fn test_describe_source() {
        let mut post = Document::forum_post("GA5", "c", "u", "instructor");
        post.kind = DocumentKind::ForumPost {
            author: "instructor".to_string(),
            created_at: "2025-02-10T08:15:00.000Z".to_string(),
            post_number: 4,
            like_count: 3,
        };
        assert_eq!(
            describe_source(&result(post, 1)),
            "forum post by instructor on 2025-02-10 (3 likes)"
        );

        let page = Document::course_content("Docker", "c", "u", "Deployment Tools");
        assert_eq!(describe_source(&result(page, 1)), "course content, Deployment Tools");
    }

    #[test]
    fn test_format_post_date_falls_back_to_raw() {
        assert_eq!(format_post_date("yesterday"), "yesterday");
    }
}
