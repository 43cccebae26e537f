//! CLI module for Support Desk
//!
//! Subcommands:
//! - `serve`: run the HTTP API (default deployment mode)
//! - `search`: rank documentation against a query without calling a provider

pub mod search;
pub mod serve;

use clap::{Parser, Subcommand};

/// Support Desk - documentation-grounded support chat backend
#[derive(Parser)]
#[command(name = "support-desk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Show which documents a query would retrieve
    Search(search::SearchArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["support-desk", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "support-desk",
            "search",
            "refund policy",
            "--threshold",
            "0.3",
            "--docs",
            "docs/docs.json",
        ])
        .unwrap();

        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "refund policy");
                assert_eq!(args.threshold, 0.3);
                assert_eq!(args.docs.as_deref(), Some("docs/docs.json"));
            }
            Command::Serve => panic!("expected search"),
        }
    }

    #[test]
    fn test_search_threshold_default() {
        let cli = Cli::try_parse_from(["support-desk", "search", "refunds"]).unwrap();
        match cli.command {
            Command::Search(args) => assert_eq!(args.threshold, 0.5),
            Command::Serve => panic!("expected search"),
        }
    }
}
