//! Cosine similarity ranking over the vector index

use vta_core::{Error, Result, SearchConfig, SimilarityResult};

use crate::index::VectorIndex;

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: b.len(),
            actual: a.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

impl VectorIndex {
    /// Search for the documents most similar to `query`.
    ///
    /// Results are cut to `top_k` before the `min_similarity` floor is
    /// applied, so fewer than `top_k` results may come back.
    pub async fn search(&self, query: &str, config: SearchConfig) -> Result<Vec<SimilarityResult>> {
        self.indexed()?;
        let query_embedding = self.provider().embed_one(query).await?;
        self.rank(&query_embedding, config)
    }

    /// Rank every indexed document against an already embedded query
    pub fn rank(&self, query_embedding: &[f32], config: SearchConfig) -> Result<Vec<SimilarityResult>> {
        let (documents, embeddings) = self.indexed()?;

        let mut scored = embeddings
            .iter()
            .enumerate()
            .map(|(index, row)| cosine_similarity(query_embedding, row).map(|score| (index, score)))
            .collect::<Result<Vec<(usize, f32)>>>()?;

        // stable: equal scores keep document order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(config.top_k);

        Ok(scored
            .into_iter()
            .enumerate()
            .filter(|(_, (_, score))| *score >= config.min_similarity)
            .map(|(position, (index, similarity))| SimilarityResult {
                document: documents[index].clone(),
                similarity,
                index,
                rank: position + 1,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{TableEmbedder, index_with};

    #[test]
    fn test_cosine_similarity() {
        let vec1 = vec![1.0, 0.0, 0.0];
        let vec2 = vec![1.0, 0.0, 0.0];
        let vec3 = vec![0.0, 1.0, 0.0];

        assert!((cosine_similarity(&vec1, &vec2).unwrap() - 1.0).abs() < 0.001);
        assert!((cosine_similarity(&vec1, &vec3).unwrap() - 0.0).abs() < 0.001);
        assert!((cosine_similarity(&[2.0, 0.0], &[5.0, 0.0]).unwrap() - 1.0).abs() < 0.001);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_fails_fast() {
        let err = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 3, actual: 2 }));
    }

    /// Unit vector whose cosine with [1, 0] is `score`
    fn at(score: f32) -> Vec<f32> {
        vec![score, (1.0 - score * score).sqrt()]
    }

    #[tokio::test]
    async fn test_search_before_build_is_usage_error() {
        let (index, _dir) = index_with(TableEmbedder::new(vec![]), vec![]).await;
        assert!(matches!(
            index.search("anything", SearchConfig::default()).await,
            Err(Error::NotIndexed)
        ));
    }

    #[tokio::test]
    async fn test_descending_with_ties_in_document_order() {
        let table = TableEmbedder::new(vec![
            ("q", vec![1.0, 0.0]),
            ("d0", at(0.5)),
            ("d1", at(0.9)),
            ("d2", at(0.5)),
            ("d3", at(0.7)),
        ]);
        let (index, _dir) = index_with(table, vec!["d0", "d1", "d2", "d3"]).await;

        let results = index
            .search("q", SearchConfig { top_k: 10, min_similarity: 0.0 })
            .await
            .unwrap();

        let order: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(results[0].document.content, "d1");
    }

    #[tokio::test]
    async fn test_top_k_is_applied_before_the_floor() {
        let table = TableEmbedder::new(vec![
            ("q", vec![1.0, 0.0]),
            ("d0", at(0.9)),
            ("d1", at(0.8)),
            ("d2", at(0.25)),
            ("d3", at(0.24)),
            ("d4", at(0.23)),
            ("d5", at(0.22)),
            ("d6", at(0.21)),
        ]);
        let (index, _dir) = index_with(table, vec!["d0", "d1", "d2", "d3", "d4", "d5", "d6"]).await;

        let results = index
            .search("q", SearchConfig { top_k: 5, min_similarity: 0.3 })
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.rank <= 5));

        // a document outside the top-k never comes back, whatever its score
        let narrow = index
            .search("q", SearchConfig { top_k: 1, min_similarity: 0.0 })
            .await
            .unwrap();
        assert_eq!(narrow.len(), 1);
        assert_eq!(narrow[0].index, 0);
    }

    #[tokio::test]
    async fn test_search_is_deterministic() {
        let table = TableEmbedder::new(vec![
            ("q", vec![1.0, 0.0]),
            ("d0", at(0.4)),
            ("d1", at(0.6)),
        ]);
        let (index, _dir) = index_with(table, vec!["d0", "d1"]).await;

        let first = index.search("q", SearchConfig::default()).await.unwrap();
        let second = index.search("q", SearchConfig::default()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let table = TableEmbedder::new(vec![("q", vec![1.0, 0.0, 0.0]), ("d0", vec![1.0, 0.0])]);
        let (index, _dir) = index_with(table, vec!["d0"]).await;

        assert!(matches!(
            index.search("q", SearchConfig::default()).await,
            Err(Error::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }
}
