//! Keyword extraction and overlap scoring

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "how",
    "what", "when", "where", "why", "which", "who", "whom", "whose",
];

/// Lowercased query terms longer than two characters, stop words removed
pub fn extract_key_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|term| term.chars().count() > 2 && !STOP_WORDS.contains(term))
        .map(str::to_string)
        .collect()
}

/// Fraction of query words that appear somewhere in `text`
pub fn keyword_overlap(query: &str, text: &str) -> f64 {
    let query = query.to_lowercase();
    let words: Vec<&str> = query.split_whitespace().collect();

    if words.is_empty() {
        return 0.0;
    }

    let text = text.to_lowercase();
    let matches = words.iter().filter(|word| text.contains(*word)).count();

    matches as f64 / words.len() as f64
}
