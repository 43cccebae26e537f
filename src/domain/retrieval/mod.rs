//! Documentation retrieval - lexical similarity search

mod keywords;
mod retriever;
mod similarity;

pub use keywords::{extract_key_terms, keyword_overlap};
pub use retriever::{find_relevant, score_document, DEFAULT_THRESHOLD, MAX_RESULTS};
pub use similarity::{edit_distance, similarity, CONTAINMENT_SCORE};
