//! Implementation of the `scholar-rag search` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use super::parse_top_k;
use crate::cli::context::build_retriever;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::Config;
use crate::services::RetrievedChunk;

const PREVIEW_CHARS: usize = 120;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to search for
    pub query: String,

    /// Number of chunks to show (defaults to retrieval.top_k)
    #[arg(short = 'k', long = "top-k", value_parser = parse_top_k)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub results: Vec<RetrievedChunk>,
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        if self.results.is_empty() {
            return "No matching chunks.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").add_attribute(Attribute::Bold),
                Cell::new("Position").add_attribute(Attribute::Bold),
                Cell::new("Distance").add_attribute(Attribute::Bold),
                Cell::new("Chunk").add_attribute(Attribute::Bold),
            ]);

        for (rank, result) in self.results.iter().enumerate() {
            table.add_row(vec![
                Cell::new(rank + 1).set_alignment(CellAlignment::Right),
                Cell::new(result.position).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.4}", result.distance)).set_alignment(CellAlignment::Right),
                Cell::new(truncate(&result.text, PREVIEW_CHARS)),
            ]);
        }
        table.to_string()
    }
}

pub async fn execute(args: SearchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let retriever = build_retriever(config, json_mode).await?;
    let results = retriever
        .retrieve_chunks(&args.query, args.top_k)
        .await
        .context("Search failed")?;

    output(
        &SearchOutput {
            query: args.query,
            results,
        },
        json_mode,
    );
    Ok(())
}
