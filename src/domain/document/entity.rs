use serde::{Deserialize, Serialize};

/// A documentation passage the assistant may quote from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A document paired with its relevance to a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    #[serde(flatten)]
    pub document: Document,
    pub similarity: f64,
}

impl ScoredDocument {
    pub fn title(&self) -> &str {
        &self.document.title
    }

    pub fn content(&self) -> &str {
        &self.document.content
    }
}

/// Extracts the document list from a documentation payload.
///
/// Accepts either a bare array or an object wrapping the array under
/// `documentation`. Anything else yields no documents.
pub fn documents_from_value(value: serde_json::Value) -> Vec<Document> {
    let list = match value {
        serde_json::Value::Object(mut map) => match map.remove("documentation") {
            Some(inner) => inner,
            None => return Vec::new(),
        },
        other => other,
    };

    match list {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Document>(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}
