//! Support prompt assembly

use crate::domain::conversation::{ConversationTurn, MessageRole};
use crate::domain::document::ScoredDocument;

/// Documentation beyond this many characters is cut
pub const MAX_DOCUMENTATION_CHARS: usize = 2000;

/// Marker appended to truncated documentation
pub const TRUNCATION_MARKER: &str = "...";

/// Reply the model is told to give when the docs do not cover a question
pub const REFUSAL_PHRASE: &str = "Sorry, I don't have information about that.";

/// Placeholder used when retrieval found nothing
pub const NO_DOCUMENTATION: &str = "No specific documentation found for this query.";

const SYSTEM_ROLE: &str =
    "You are a helpful AI Support Assistant. Answer based ONLY on the provided documentation.";

/// Builds the full prompt sent to the provider.
///
/// Section order is fixed: role and rules, `DOCUMENTATION:`, an optional
/// `RECENT CONVERSATION:` (only for non-empty `context`), then `QUESTION:`
/// with the query verbatim.
pub fn build_prompt(query: &str, documentation: &str, context: &str) -> String {
    let documentation = truncate_documentation(documentation);

    let mut prompt = String::with_capacity(documentation.len() + context.len() + query.len() + 512);

    prompt.push_str(SYSTEM_ROLE);
    prompt.push_str("\n\nRules:\n");
    prompt.push_str("1. Use ONLY the documentation to answer\n");
    prompt.push_str(&format!("2. If not in docs, say: \"{}\"\n", REFUSAL_PHRASE));
    prompt.push_str("3. Be concise and helpful\n");
    prompt.push_str("4. Don't make up information\n\n");

    prompt.push_str("DOCUMENTATION:\n");
    prompt.push_str(&documentation);
    prompt.push_str("\n\n");

    if !context.is_empty() {
        prompt.push_str("RECENT CONVERSATION:\n");
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }

    prompt.push_str("QUESTION:\n");
    prompt.push_str(query);

    prompt
}

fn truncate_documentation(documentation: &str) -> String {
    match documentation.char_indices().nth(MAX_DOCUMENTATION_CHARS) {
        Some((cut, _)) => format!("{}{}", &documentation[..cut], TRUNCATION_MARKER),
        None => documentation.to_string(),
    }
}

/// Joins retrieved documents as `title: content` blocks
pub fn format_documentation(documents: &[ScoredDocument]) -> String {
    if documents.is_empty() {
        return NO_DOCUMENTATION.to_string();
    }

    documents
        .iter()
        .map(|doc| format!("{}: {}", doc.title(), doc.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders conversation turns, oldest first; empty history renders as ""
pub fn format_history(turns: &[ConversationTurn]) -> String {
    if turns.is_empty() {
        return String::new();
    }

    let mut history = String::from("Previous conversation:\n");

    for turn in turns {
        let speaker = match turn.role {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        };
        history.push_str(&format!("{}: {}\n", speaker, turn.content));
    }

    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Document;
    use chrono::Utc;

    fn turn(role: MessageRole, content: &str) -> ConversationTurn {
        ConversationTurn {
            id: 1,
            session_id: "s1".to_string(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_section_order() {
        let prompt = build_prompt("How do refunds work?", "Refunds: 30 days", "User: hi\n");

        let rules = prompt.find("Rules:").unwrap();
        let docs = prompt.find("DOCUMENTATION:").unwrap();
        let context = prompt.find("RECENT CONVERSATION:").unwrap();
        let question = prompt.find("QUESTION:").unwrap();

        assert!(prompt.starts_with(SYSTEM_ROLE));
        assert!(rules < docs && docs < context && context < question);
    }

    #[test]
    fn test_rules_present() {
        let prompt = build_prompt("q", "d", "");

        assert!(prompt.contains("1. Use ONLY the documentation to answer"));
        assert!(prompt.contains("2. If not in docs, say: \"Sorry, I don't have information about that.\""));
        assert!(prompt.contains("3. Be concise and helpful"));
        assert!(prompt.contains("4. Don't make up information"));
    }

    #[test]
    fn test_exact_layout_without_context() {
        let prompt = build_prompt("Where is my order?", "Shipping: 2 days", "");
        let expected_tail = "DOCUMENTATION:\nShipping: 2 days\n\nQUESTION:\nWhere is my order?";

        assert!(prompt.ends_with(expected_tail));
        assert!(!prompt.contains("RECENT CONVERSATION:"));
    }

    #[test]
    fn test_context_section_included() {
        let prompt = build_prompt("q", "d", "Previous conversation:\nUser: hi\n");

        assert!(prompt.contains(
            "RECENT CONVERSATION:\nPrevious conversation:\nUser: hi\n\n\nQUESTION:\nq"
        ));
    }

    #[test]
    fn test_long_documentation_truncated() {
        let docs = "x".repeat(2500);
        let prompt = build_prompt("q", &docs, "");

        let expected = format!("DOCUMENTATION:\n{}...\n\n", "x".repeat(2000));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"x".repeat(2001)));
    }

    #[test]
    fn test_documentation_at_limit_not_truncated() {
        let docs = "y".repeat(2000);
        let prompt = build_prompt("q", &docs, "");

        assert!(prompt.contains(&format!("DOCUMENTATION:\n{}\n\n", docs)));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let docs = "é".repeat(2001);
        let prompt = build_prompt("q", &docs, "");

        assert!(prompt.contains(&format!("{}...", "é".repeat(2000))));
    }

    #[test]
    fn test_query_embedded_verbatim() {
        let query = "  Wie lange dauert die Rückerstattung?\n\"quoted\" ";
        let prompt = build_prompt(query, "d", "");

        assert!(prompt.ends_with(&format!("QUESTION:\n{}", query)));
    }

    #[test]
    fn test_format_documentation() {
        let docs = vec![
            ScoredDocument {
                document: Document::new("Refunds", "30 days"),
                similarity: 0.9,
            },
            ScoredDocument {
                document: Document::new("Shipping", "2 days"),
                similarity: 0.6,
            },
        ];

        assert_eq!(
            format_documentation(&docs),
            "Refunds: 30 days\n\nShipping: 2 days"
        );
        assert_eq!(format_documentation(&[]), NO_DOCUMENTATION);
    }

    #[test]
    fn test_format_history() {
        let turns = vec![
            turn(MessageRole::User, "Hi"),
            turn(MessageRole::Assistant, "Hello!"),
        ];

        assert_eq!(
            format_history(&turns),
            "Previous conversation:\nUser: Hi\nAssistant: Hello!\n"
        );
        assert_eq!(format_history(&[]), "");
    }
}
