//! File-backed documentation store

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::domain::{documents_from_value, Document};

/// Documentation loaded from a JSON file, swappable at runtime.
///
/// Readers take an `Arc` snapshot; `reload` replaces it without affecting
/// snapshots already handed out.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    documents: RwLock<Arc<Vec<Document>>>,
}

impl DocumentStore {
    /// Read `path` once. Failures are logged and leave the store empty.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let documents = read_documents(&path).await;

        info!(path = %path.display(), count = documents.len(), "Documentation loaded");

        Self {
            path,
            documents: RwLock::new(Arc::new(documents)),
        }
    }

    /// Store with fixed contents and no backing file
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            path: PathBuf::new(),
            documents: RwLock::new(Arc::new(documents)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn documents(&self) -> Arc<Vec<Document>> {
        match self.documents.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Re-read the backing file and swap the snapshot; returns the new count
    pub async fn reload(&self) -> usize {
        let documents = Arc::new(read_documents(&self.path).await);
        let count = documents.len();

        match self.documents.write() {
            Ok(mut guard) => *guard = documents,
            Err(poisoned) => *poisoned.into_inner() = documents,
        }

        info!(path = %self.path.display(), count, "Documentation reloaded");
        count
    }
}

async fn read_documents(path: &Path) -> Vec<Document> {
    if path.as_os_str().is_empty() {
        return Vec::new();
    }

    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read documentation file");
            return Vec::new();
        }
    };

    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => {
            let documents = documents_from_value(value);
            if documents.is_empty() {
                warn!(path = %path.display(), "Documentation file has no usable entries");
            }
            documents
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse documentation file");
            Vec::new()
        }
    }
}
