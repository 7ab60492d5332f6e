//! Implementation of the `scholar-rag download` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::context::ingestion_service;
use crate::cli::output::{create_spinner, output, CommandOutput};
use crate::domain::models::{abstracts, Config};

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Search query (defaults to ingestion.query)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Maximum number of papers (defaults to ingestion.limit)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DownloadOutput {
    pub query: String,
    pub fetched: usize,
    pub with_abstract: usize,
    pub cache_path: String,
}

impl CommandOutput for DownloadOutput {
    fn to_human(&self) -> String {
        format!(
            "Fetched {} papers for \"{}\" ({} with abstracts)\nSaved to {}",
            self.fetched, self.query, self.with_abstract, self.cache_path
        )
    }
}

pub async fn execute(args: DownloadArgs, config: &Config, json_mode: bool) -> Result<()> {
    let query = args.query.unwrap_or_else(|| config.ingestion.query.clone());
    let limit = args.limit.unwrap_or(config.ingestion.limit);
    let (service, _) = ingestion_service(config)?;

    let spinner = create_spinner(format!("Fetching papers for \"{query}\"..."), json_mode);
    let papers = service.refresh_papers(&query, limit).await;
    spinner.finish_and_clear();
    let papers = papers.context("Failed to download papers")?;

    output(
        &DownloadOutput {
            fetched: papers.len(),
            with_abstract: abstracts(&papers).len(),
            query,
            cache_path: config.cache.papers_path.clone(),
        },
        json_mode,
    );
    Ok(())
}
