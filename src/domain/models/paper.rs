//! Paper metadata as returned by the search API.

use serde::{Deserialize, Serialize};

/// A paper author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Stable author identifier, when the API knows one
    #[serde(default)]
    pub author_id: Option<String>,

    /// Display name
    pub name: String,
}

/// A scientific paper with its abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// API paper identifier
    pub paper_id: String,

    /// Paper title
    #[serde(default)]
    pub title: String,

    /// Abstract text; many records have none
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Authors in publication order
    #[serde(default)]
    pub authors: Vec<Author>,

    /// Landing page URL
    #[serde(default)]
    pub url: Option<String>,
}

impl Paper {
    /// The abstract, if present and not blank.
    pub fn usable_abstract(&self) -> Option<&str> {
        self.abstract_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Collect the usable abstracts of a paper set, preserving order.
pub fn abstracts(papers: &[Paper]) -> Vec<String> {
    papers
        .iter()
        .filter_map(Paper::usable_abstract)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, abstract_text: Option<&str>) -> Paper {
        Paper {
            paper_id: id.to_string(),
            title: format!("Paper {id}"),
            abstract_text: abstract_text.map(str::to_string),
            authors: vec![],
            url: None,
        }
    }

    #[test]
    fn test_deserialize_api_record() {
        let json = r#"{
            "paperId": "abc123",
            "title": "Deep Learning for Code",
            "abstract": "We study models.",
            "authors": [{"authorId": "1", "name": "Ada"}, {"authorId": null, "name": "Bob"}],
            "url": "https://example.org/abc123"
        }"#;

        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.paper_id, "abc123");
        assert_eq!(paper.abstract_text.as_deref(), Some("We study models."));
        assert_eq!(paper.authors.len(), 2);
        assert_eq!(paper.authors[1].author_id, None);
    }

    #[test]
    fn test_null_abstract() {
        let json = r#"{"paperId": "x", "title": "T", "abstract": null, "authors": []}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert!(paper.usable_abstract().is_none());
    }

    #[test]
    fn test_abstracts_drops_missing_and_blank() {
        let papers = vec![
            paper("1", Some("First.")),
            paper("2", None),
            paper("3", Some("   ")),
            paper("4", Some(" Fourth. ")),
        ];

        assert_eq!(abstracts(&papers), vec!["First.", "Fourth."]);
    }
}
