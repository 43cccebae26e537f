//! Search command - offline retrieval check against the documentation file

use clap::Args;

use crate::config::AppConfig;
use crate::domain::retrieval::{extract_key_terms, keyword_overlap};
use crate::domain::{find_relevant, ScoredDocument};
use crate::infrastructure::documents::DocumentStore;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::services::RETRIEVAL_THRESHOLD;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query text, scored exactly as a chat message would be
    pub query: String,

    /// Minimum combined score
    #[arg(long, default_value_t = RETRIEVAL_THRESHOLD)]
    pub threshold: f64,

    /// Documentation file; defaults to `documents.path` from config
    #[arg(long)]
    pub docs: Option<String>,
}

/// Print the documents the chat pipeline would put into the prompt
pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let path = args.docs.unwrap_or(config.documents.path);
    let store = DocumentStore::load(&path).await;
    let documents = store.documents();

    let results = find_relevant(&args.query, &documents, args.threshold);

    println!(
        "{} of {} documents match \"{}\" (threshold {:.2})",
        results.len(),
        documents.len(),
        args.query,
        args.threshold
    );
    println!("key terms: {}", extract_key_terms(&args.query).join(", "));

    for line in render_results(&args.query, &results) {
        println!("{}", line);
    }

    Ok(())
}

fn render_results(query: &str, results: &[ScoredDocument]) -> Vec<String> {
    results
        .iter()
        .enumerate()
        .map(|(rank, doc)| {
            format!(
                "{:>2}. {:.4}  {}  (keyword overlap {:.2})",
                rank + 1,
                doc.similarity,
                doc.title(),
                keyword_overlap(query, doc.content())
            )
        })
        .collect()
}
