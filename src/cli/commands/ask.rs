//! Implementation of the `scholar-rag ask` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::context::build_agent;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub query: String,
    pub answer: String,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        self.answer.clone()
    }
}

pub async fn execute(args: AskArgs, config: &Config, json_mode: bool) -> Result<()> {
    let agent = build_agent(config, json_mode).await?;
    let answer = agent
        .answer(&args.query)
        .await
        .context("Failed to answer the query")?;

    output(
        &AskOutput {
            query: args.query,
            answer,
        },
        json_mode,
    );
    Ok(())
}
