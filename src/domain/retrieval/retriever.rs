//! Lexical document retrieval

use std::cmp::Ordering;

use super::similarity::similarity;
use crate::domain::document::{Document, ScoredDocument};

/// Minimum combined score used when the caller has no opinion
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Upper bound on returned documents
pub const MAX_RESULTS: usize = 5;

const TITLE_WEIGHT: f64 = 0.6;
const CONTENT_WEIGHT: f64 = 0.4;

/// Ranks `documents` against `query`.
///
/// Each document scores `0.6 * sim(query, title) + 0.4 * sim(query, content)`.
/// Documents below `threshold` are dropped, the rest are sorted by score
/// (equal scores keep their input order) and cut to [`MAX_RESULTS`].
pub fn find_relevant(query: &str, documents: &[Document], threshold: f64) -> Vec<ScoredDocument> {
    let mut scored: Vec<ScoredDocument> = documents
        .iter()
        .map(|doc| ScoredDocument {
            similarity: score_document(query, doc),
            document: doc.clone(),
        })
        .filter(|doc| doc.similarity >= threshold)
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(MAX_RESULTS);

    scored
}

/// Combined title/content score of a single document
pub fn score_document(query: &str, document: &Document) -> f64 {
    TITLE_WEIGHT * similarity(query, &document.title)
        + CONTENT_WEIGHT * similarity(query, &document.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::documents_from_value;

    fn support_docs() -> Vec<Document> {
        vec![
            Document::new("Refunds", "We refund within 30 days of purchase."),
            Document::new("Shipping", "Orders ship within 2 business days."),
            Document::new("Account", "Reset your password from the settings page."),
        ]
    }

    #[test]
    fn test_refund_query_finds_refunds_doc() {
        let results = find_relevant("refund policy", &support_docs(), DEFAULT_THRESHOLD);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), "Refunds");
        assert!(results[0].similarity >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_combined_score_weights_title() {
        let doc = Document::new("Shipping", "x");
        let score = score_document("shipping", &doc);
        assert!((score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_descending() {
        let results = find_relevant("refunds", &support_docs(), 0.0);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title(), "Refunds");
        assert!(results
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity));
    }

    #[test]
    fn test_never_more_than_five() {
        let docs: Vec<Document> = (0..12)
            .map(|i| Document::new(format!("Topic {i}"), "faq"))
            .collect();

        let results = find_relevant("faq", &docs, 0.0);
        assert_eq!(results.len(), MAX_RESULTS);
    }

    #[test]
    fn test_every_result_meets_threshold() {
        let threshold = 0.5;
        let results = find_relevant("shipping", &support_docs(), threshold);

        assert!(!results.is_empty());
        assert!(results.iter().all(|doc| doc.similarity >= threshold));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let docs = vec![
            Document::new("Alpha", "same body"),
            Document::new("Gamma", "same body"),
            Document::new("Zeta", "same body"),
        ];

        // titles share no letters with the query; contents all contain it
        let results = find_relevant("body", &docs, 0.0);
        let titles: Vec<&str> = results.iter().map(|d| d.title()).collect();

        assert!(results.iter().all(|d| d.similarity == results[0].similarity));
        assert_eq!(titles, vec!["Alpha", "Gamma", "Zeta"]);
    }

    #[test]
    fn test_empty_documents() {
        assert!(find_relevant("anything", &[], DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_non_array_source_yields_nothing() {
        let docs = documents_from_value(serde_json::json!("not-an-array"));
        assert!(find_relevant("anything", &docs, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_high_threshold_filters_everything() {
        assert!(find_relevant("refund policy", &support_docs(), 0.99).is_empty());
    }
}
