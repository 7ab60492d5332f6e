//! Implementation of the `scholar-rag ingest` command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::cli::context::{index_location, prepare_index};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::IndexOrigin;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Rebuild even if the persisted index is up to date
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct IngestOutput {
    pub chunks: usize,
    pub dimension: Option<usize>,
    pub embedding_model: String,
    pub reused: bool,
    pub built_at: DateTime<Utc>,
    pub index_path: String,
}

impl CommandOutput for IngestOutput {
    fn to_human(&self) -> String {
        let action = if self.reused {
            "Index is up to date"
        } else {
            "Built index"
        };
        format!(
            "{action}: {} chunks, {} dimensions, model {}\nBuilt at {}\nStored at {}",
            self.chunks,
            self.dimension.map_or_else(|| "-".to_string(), |d| d.to_string()),
            self.embedding_model,
            self.built_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.index_path,
        )
    }
}

pub async fn execute(args: IngestArgs, config: &Config, json_mode: bool) -> Result<()> {
    let (prepared, _) = prepare_index(config, args.force, json_mode).await?;
    let index = &prepared.index;

    output(
        &IngestOutput {
            chunks: index.len(),
            dimension: index.dimension(),
            embedding_model: index.embedding_model().to_string(),
            reused: prepared.origin == IndexOrigin::Reused,
            built_at: index.built_at(),
            index_path: index_location(config),
        },
        json_mode,
    );
    Ok(())
}
