//! Storage types shared across modules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Indexing outcome recorded for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Indexed with content; the only status returned by search.
    #[default]
    Finished,
    /// Fetching or parsing failed.
    Error,
    /// Seen but has no searchable content (feeds, sitemaps).
    Unindexable,
}

impl PageStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Error => "error",
            Self::Unindexable => "unindexable",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finished" => Ok(Self::Finished),
            "error" => Ok(Self::Error),
            "unindexable" => Ok(Self::Unindexable),
            other => Err(format!("unknown page status: {other}")),
        }
    }
}

/// A page to add to the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPage {
    pub source: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub status: PageStatus,
}

impl NewPage {
    pub fn new(source: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub const fn status(mut self, status: PageStatus) -> Self {
        self.status = status;
        self
    }
}

/// A stored page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: i64,
    pub source: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub status: PageStatus,
    pub crawled_at: String,
}

/// A run of text in a search result, highlighted when it matched the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub highlighted: bool,
    pub content: String,
}

impl Match {
    pub fn plain(content: impl Into<String>) -> Self {
        Self { highlighted: false, content: content.into() }
    }

    pub fn highlighted(content: impl Into<String>) -> Self {
        Self { highlighted: true, content: content.into() }
    }
}

/// One full-text search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: Vec<Match>,
    pub description: Vec<Match>,
    pub content: Vec<Match>,
    /// bm25 score; lower is better.
    pub rank: f64,
}

/// One page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<SearchHit>,
    /// Number of matching pages across all result pages.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// A dictionary word proposed for a possibly misspelled word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub word: String,
    pub distance: i64,
    pub score: i64,
    pub rank: i64,
}

/// What a spellfix index build changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub inserted: u64,
    pub updated: u64,
    pub deleted: u64,
    /// Words in the index after the build.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_status_round_trips_as_lowercase() {
        assert_eq!(serde_json::to_string(&PageStatus::Unindexable).unwrap(), "\"unindexable\"");
        assert_eq!("error".parse::<PageStatus>().unwrap(), PageStatus::Error);
        assert!("crawling".parse::<PageStatus>().is_err());
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page {
            id: 1,
            source: "docs".to_owned(),
            url: "/fox".to_owned(),
            title: "Fox".to_owned(),
            description: String::new(),
            content: String::new(),
            status: PageStatus::Finished,
            crawled_at: "2024-01-01T00:00:00+00:00".to_owned(),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["crawledAt"], "2024-01-01T00:00:00+00:00");
        assert_eq!(json["status"], "finished");
    }
}
