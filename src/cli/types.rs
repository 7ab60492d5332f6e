//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::{ask::AskArgs, download::DownloadArgs, ingest::IngestArgs, search::SearchArgs};

#[derive(Parser, Debug)]
#[command(name = "scholar-rag")]
#[command(about = "Ask questions about scientific paper abstracts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (defaults to config/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive question answering (default)
    Chat,

    /// Answer a single question and exit
    Ask(AskArgs),

    /// Show the chunks nearest to a query
    Search(SearchArgs),

    /// Build or refresh the vector index
    Ingest(IngestArgs),

    /// Refresh the cached paper set from Semantic Scholar
    Download(DownloadArgs),
}
