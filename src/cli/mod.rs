//! CLI module - Command-line interface for ramen-bot
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// ramen-bot - LINE bot that finds ramen shops near a shared location
#[derive(Parser)]
#[command(name = "ramen-bot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook and API server
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Run one nearby search and print the shops
    #[command(alias = "s")]
    Search {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Keyword, defaults to search.keyword from the config
        #[arg(long)]
        keyword: Option<String>,
        /// Maximum number of shops to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "ramen-bot", "search", "--lat", "35.681", "--lng", "139.767", "--limit", "3",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Search {
                lat,
                lng,
                keyword,
                limit,
            }) => {
                assert!((lat - 35.681).abs() < 1e-9);
                assert!((lng - 139.767).abs() < 1e-9);
                assert!(keyword.is_none());
                assert_eq!(limit, 3);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_serve_aliases() {
        for alias in ["serve", "daemon", "web"] {
            let cli = Cli::try_parse_from(["ramen-bot", alias]).unwrap();
            assert!(matches!(cli.command, Some(Commands::Serve)));
        }
        let cli = Cli::try_parse_from(["ramen-bot"]).unwrap();
        assert!(cli.command.is_none());
    }
}
