use serde::Deserialize;

use crate::domain::models::Paper;

/// Fields requested for every paper
pub const PAPER_FIELDS: &str = "title,abstract,authors,url";

/// One page of `/graph/v1/paper/search` results
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub offset: usize,
    /// Offset of the following page; absent on the last page
    #[serde(default)]
    pub next: Option<usize>,
    #[serde(default)]
    pub data: Vec<Paper>,
}
