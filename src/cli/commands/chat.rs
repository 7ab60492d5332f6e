//! Implementation of the interactive `scholar-rag chat` loop.

use std::io::Write;

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::context::build_agent;
use crate::domain::models::Config;
use crate::services::ResearchAgent;

/// What a line of user input asks for
#[derive(Debug, PartialEq, Eq)]
pub enum Turn<'a> {
    Exit,
    Skip,
    Query(&'a str),
}

/// Classify one input line; `exit` in any case ends the session
pub fn classify(line: &str) -> Turn<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Turn::Skip
    } else if trimmed.eq_ignore_ascii_case("exit") {
        Turn::Exit
    } else {
        Turn::Query(trimmed)
    }
}

pub async fn execute(config: &Config) -> Result<()> {
    let agent = build_agent(config, false).await?;

    let mut stdout = std::io::stdout();
    writeln!(
        stdout,
        "{} {} chunks indexed. Type 'exit' to quit.",
        style("Ready.").green().bold(),
        agent.retriever().index().len()
    )?;

    run_session(&agent, BufReader::new(tokio::io::stdin()), &mut stdout).await
}

/// Read queries line by line until `exit` or end of input.
///
/// Lines are decoded lossily. Errors from a single turn are printed and
/// the session continues.
pub async fn run_session<R, W>(agent: &ResearchAgent, mut input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buffer = Vec::new();

    loop {
        write!(out, "{} ", style("Query>").cyan().bold())?;
        out.flush()?;

        buffer.clear();
        if input.read_until(b'\n', &mut buffer).await? == 0 {
            writeln!(out)?;
            break;
        }
        let line = String::from_utf8_lossy(&buffer);

        let query = match classify(&line) {
            Turn::Exit => break,
            Turn::Skip => continue,
            Turn::Query(query) => query,
        };

        match agent.answer(query).await {
            Ok(answer) => writeln!(out, "{}\n{answer}\n", style("Answer:").green().bold())?,
            Err(err) => {
                if err.is_invariant_violation() {
                    tracing::error!(error = %err, "index invariant violated");
                } else {
                    tracing::warn!(error = %err, "query failed");
                }
                writeln!(out, "{} {err}\n", style("Error:").red().bold())?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{CannedModel, TableEmbedder};
    use crate::services::{PairedIndex, Retriever};
    use std::sync::Arc;
    use std::time::Duration;

    fn agent(model: Arc<CannedModel>) -> ResearchAgent {
        let index = PairedIndex::build(
            "table",
            vec!["Transformers help code review.".to_string()],
            &[vec![1.0, 0.0]],
        )
        .unwrap();
        let embedder = TableEmbedder::new("table", &[("what helps review?", vec![1.0, 0.0])]);
        let retriever = Retriever::new(Arc::new(index), Arc::new(embedder), 5);
        ResearchAgent::new(Arc::new(retriever), model, Duration::from_secs(5))
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("exit"), Turn::Exit);
        assert_eq!(classify("  EXIT \n"), Turn::Exit);
        assert_eq!(classify("Exit"), Turn::Exit);
        assert_eq!(classify("   "), Turn::Skip);
        assert_eq!(classify(""), Turn::Skip);
        assert_eq!(classify(" exit now "), Turn::Query("exit now"));
    }

    #[tokio::test]
    async fn test_session_answers_until_exit() {
        let model = Arc::new(CannedModel::new("Transformers."));
        let agent = agent(model.clone());
        let input: &[u8] = b"\nwhat helps review?\nEXIT\nwhat helps review?\n";
        let mut out = Vec::new();

        run_session(&agent, input, &mut out).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Transformers.").count(), 1);
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_session_continues_after_invalid_utf8_line() {
        let model = Arc::new(CannedModel::new("Transformers."));
        let agent = agent(model.clone());
        let input: &[u8] = b"\xff\xfe\nwhat helps review?\n";
        let mut out = Vec::new();

        run_session(&agent, input, &mut out).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Embedding failed"));
        assert!(printed.contains("Transformers."));
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_session_survives_failed_turn_and_ends_at_eof() {
        let model = Arc::new(CannedModel::new("Transformers."));
        let agent = agent(model.clone());
        let input: &[u8] = b"unknown query\nwhat helps review?\n";
        let mut out = Vec::new();

        run_session(&agent, input, &mut out).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Embedding failed"));
        assert!(printed.contains("Transformers."));
        assert_eq!(model.prompts().len(), 1);
    }
}
