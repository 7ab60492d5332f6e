//! CLI command implementations.

pub mod ask;
pub mod chat;
pub mod download;
pub mod ingest;
pub mod search;

/// Parse a positive `top_k`
pub(crate) fn parse_top_k(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(k) => Ok(k),
        Err(e) => Err(e.to_string()),
    }
}
